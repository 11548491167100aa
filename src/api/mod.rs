pub mod types;
pub mod yad2;

pub use types::{Listing, Marker};
pub use yad2::{ListingSource, SourceError, Yad2Client};
