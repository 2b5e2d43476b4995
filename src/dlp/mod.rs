//! DLP service access.
//!
//! DlpService -> the five remote calls this tool issues (blocking, one at a time)
//! model      -> request / response wire types
//! client     -> RestClient (async, reqwest) + BlockingClient (DlpService impl)
//! error      -> DlpError
//!
pub mod client;
pub mod error;
pub mod model;

pub use client::{BlockingClient, RestClient};
pub use error::DlpError;

use model::{
    DeidentifyContentRequest, DeidentifyContentResponse, InspectContentRequest,
    InspectContentResponse, ListInfoTypesRequest, ListInfoTypesResponse,
    ListRootCategoriesRequest, ListRootCategoriesResponse, RedactContentRequest,
    RedactContentResponse,
};

/// Remote DLP operations, one request in, one response (or error) out.
///
/// Commands receive the client as `&dyn DlpService`, so tests can swap in a
/// double without touching the network.
pub trait DlpService {
    fn inspect_content(
        &self,
        req: &InspectContentRequest,
    ) -> error::Result<InspectContentResponse>;

    fn redact_content(&self, req: &RedactContentRequest) -> error::Result<RedactContentResponse>;

    fn deidentify_content(
        &self,
        req: &DeidentifyContentRequest,
    ) -> error::Result<DeidentifyContentResponse>;

    fn list_info_types(&self, req: &ListInfoTypesRequest) -> error::Result<ListInfoTypesResponse>;

    fn list_root_categories(
        &self,
        req: &ListRootCategoriesRequest,
    ) -> error::Result<ListRootCategoriesResponse>;
}
