//! Core API behaviour across the store, the codec and the backup manager

mod store_roundtrip;
