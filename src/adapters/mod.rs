pub mod chain;
pub mod http_source;
pub mod ipfs;
pub mod storage;

pub use chain::ChainRestClient;
pub use http_source::HttpDataSource;
pub use ipfs::IpfsUploader;
pub use storage::LocalStorage;
