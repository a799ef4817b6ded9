//! Platform paths

pub mod xdg_root;
