pub mod nonograms_org;
pub mod webpbn;

pub use nonograms_org::NonogramsOrgSource;
pub use webpbn::WebpbnSource;
