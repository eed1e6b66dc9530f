//! HTTP layer: downloading form PDFs, probing their reachability, and
//! pushing validated applications to the remote document store.

mod fetch;
mod probe;
mod seed;

pub use fetch::{FormFetcher, HttpFetcher, SyncError};
pub use probe::{PdfAccess, PdfProbe, PdfProber};
pub use seed::SeedClient;
