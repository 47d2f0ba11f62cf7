pub mod combined;
pub mod grid;
pub mod show;
pub mod slots;
