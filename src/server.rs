//! RPC server implementation and tool routing.

use std::sync::Arc;

use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};

use crate::state::CatalogState;
use crate::tools::{
    BrowseCurriculumRequest, CatalogStatsRequest, DeleteResourceRequest,
    GetSearchSuggestionsRequest, ListResourcesRequest, SearchResourcesRequest,
    UpdateResourceRequest, UploadResourceRequest, handle_browse_curriculum, handle_catalog_stats,
    handle_delete_resource, handle_get_search_suggestions, handle_list_resources,
    handle_search_resources, handle_update_resource, handle_upload_resource,
};

/// RPC server for the EduNexus resource catalog.
#[derive(Clone)]
pub struct CatalogServer {
    /// Shared catalog state (stores, config, suggestion cache)
    state: Arc<CatalogState>,

    /// Tool router for handling RPC tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for CatalogServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogServer")
            .field("state", &self.state)
            .finish()
    }
}

#[tool_router]
impl CatalogServer {
    pub fn new(state: Arc<CatalogState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    /// Get a reference to the shared state.
    pub fn state(&self) -> &Arc<CatalogState> {
        &self.state
    }

    #[tool(
        description = "Search the resource catalog. Accepts exact-match filters (branch, regulation, year, semester, subject, unit, document type, file type), an optional free-text query over titles/descriptions/subject codes/tags, a sort spec, and a 1-based page number. Returns a JSON page with resources, total and has_more."
    )]
    async fn search_resources(
        &self,
        Parameters(request): Parameters<SearchResourcesRequest>,
    ) -> Result<String, String> {
        handle_search_resources(&self.state, request).await
    }

    #[tool(
        description = "Autocomplete suggestions for the search box: up to 8 distinct titles and subject codes matching a partial term of at least 2 characters. Returns a JSON array of strings."
    )]
    async fn get_search_suggestions(
        &self,
        Parameters(request): Parameters<GetSearchSuggestionsRequest>,
    ) -> Result<String, String> {
        handle_get_search_suggestions(&self.state, request).await
    }

    #[tool(
        description = "Browse the curriculum hierarchy. Returns the next level below the given scope: years, then semesters, then subject codes, then units. Only values that actually have resources are listed."
    )]
    async fn browse_curriculum(
        &self,
        Parameters(request): Parameters<BrowseCurriculumRequest>,
    ) -> Result<String, String> {
        handle_browse_curriculum(&self.state, request).await
    }

    #[tool(
        description = "List one page of the resources in a single curriculum slot (branch + regulation + year + semester + subject), newest first, optionally narrowed by document type or unit."
    )]
    async fn list_resources(
        &self,
        Parameters(request): Parameters<ListResourcesRequest>,
    ) -> Result<String, String> {
        handle_list_resources(&self.state, request).await
    }

    #[tool(
        description = "Admin: upload a file into the catalog. Copies the file at source_path into the object store, derives file type and MIME type from the extension, validates the classification, and creates the record. Returns the created resource as JSON."
    )]
    async fn upload_resource(
        &self,
        Parameters(request): Parameters<UploadResourceRequest>,
    ) -> Result<String, String> {
        handle_upload_resource(&self.state, request).await
    }

    #[tool(
        description = "Admin: edit a resource's metadata (title, description, tags, classification). The file content is immutable. Returns the updated resource as JSON."
    )]
    async fn update_resource(
        &self,
        Parameters(request): Parameters<UpdateResourceRequest>,
    ) -> Result<String, String> {
        handle_update_resource(&self.state, request).await
    }

    #[tool(
        description = "Admin: delete a resource record and remove its backing file from the object store."
    )]
    async fn delete_resource(
        &self,
        Parameters(request): Parameters<DeleteResourceRequest>,
    ) -> Result<String, String> {
        handle_delete_resource(&self.state, request).await
    }

    #[tool(
        description = "Admin: catalog statistics — totals plus per-document-type, per-branch and per-file-type counts and the newest upload timestamp."
    )]
    async fn catalog_stats(
        &self,
        Parameters(request): Parameters<CatalogStatsRequest>,
    ) -> Result<String, String> {
        handle_catalog_stats(&self.state, request).await
    }
}

#[tool_handler]
impl ServerHandler for CatalogServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "edunexus: the resource catalog service for a department's academic \
                 resources. Browse the curriculum hierarchy with browse_curriculum, \
                 search with search_resources, and manage records with the admin \
                 upload/update/delete tools.",
            )
    }
}
