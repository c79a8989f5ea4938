pub mod bikes;

pub use bikes::{bikes_page, BikesVm};
