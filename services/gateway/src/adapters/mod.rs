pub mod http;
pub mod resources;
pub mod session_file;

pub use http::{HttpClient, RestResource};
pub use resources::{
    ClientResource, IncidentResource, InterventionResource, ProductResource, ReportResource,
    Resources, UserResource,
};
pub use session_file::FileSessionStorage;
