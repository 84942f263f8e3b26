pub mod guest_store;
