//! Canned-response `DlpService` double that counts calls and records the last request.

use serde::Serialize;
use std::cell::{Cell, RefCell};

use crate::dlp::error::Result;
use crate::dlp::model::{
    DeidentifyContentRequest, DeidentifyContentResponse, InspectContentRequest,
    InspectContentResponse, ListInfoTypesRequest, ListInfoTypesResponse,
    ListRootCategoriesRequest, ListRootCategoriesResponse, RedactContentRequest,
    RedactContentResponse,
};
use crate::dlp::{DlpError, DlpService};

#[derive(Default)]
pub struct FakeClient {
    fail: bool,
    calls: Cell<usize>,
    last: RefCell<Option<serde_json::Value>>,
    inspect: InspectContentResponse,
    redact: RedactContentResponse,
    deidentify: DeidentifyContentResponse,
    info_types: ListInfoTypesResponse,
    categories: ListRootCategoriesResponse,
}

impl FakeClient {
    /// Every call fails with a 503.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_inspect(mut self, resp: InspectContentResponse) -> Self {
        self.inspect = resp;
        self
    }

    pub fn with_redact(mut self, resp: RedactContentResponse) -> Self {
        self.redact = resp;
        self
    }

    pub fn with_deidentify(mut self, resp: DeidentifyContentResponse) -> Self {
        self.deidentify = resp;
        self
    }

    pub fn with_info_types(mut self, resp: ListInfoTypesResponse) -> Self {
        self.info_types = resp;
        self
    }

    pub fn with_categories(mut self, resp: ListRootCategoriesResponse) -> Self {
        self.categories = resp;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Last request received, as its wire JSON.
    pub fn last_request(&self) -> Option<serde_json::Value> {
        self.last.borrow().clone()
    }

    fn answer<Q: Serialize, R: Clone>(&self, req: &Q, canned: &R) -> Result<R> {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = serde_json::to_value(req).ok();
        if self.fail {
            return Err(DlpError::Status {
                status: 503,
                message: "service unavailable".into(),
            });
        }
        Ok(canned.clone())
    }
}

impl DlpService for FakeClient {
    fn inspect_content(&self, req: &InspectContentRequest) -> Result<InspectContentResponse> {
        self.answer(req, &self.inspect)
    }

    fn redact_content(&self, req: &RedactContentRequest) -> Result<RedactContentResponse> {
        self.answer(req, &self.redact)
    }

    fn deidentify_content(
        &self,
        req: &DeidentifyContentRequest,
    ) -> Result<DeidentifyContentResponse> {
        self.answer(req, &self.deidentify)
    }

    fn list_info_types(&self, req: &ListInfoTypesRequest) -> Result<ListInfoTypesResponse> {
        self.answer(req, &self.info_types)
    }

    fn list_root_categories(
        &self,
        req: &ListRootCategoriesRequest,
    ) -> Result<ListRootCategoriesResponse> {
        self.answer(req, &self.categories)
    }
}
