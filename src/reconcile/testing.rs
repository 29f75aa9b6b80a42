//! In-memory [`IntegrationClient`] for tests

use std::sync::Mutex;

use crate::error::RemoteError;
use crate::remote::{ConfigDocument, IntegrationClient, Page, RemoteIntegration};

pub fn integration(id: &str, name: &str) -> RemoteIntegration {
    RemoteIntegration {
        id: id.to_string(),
        provider_key: "slack".to_string(),
        name: name.to_string(),
        config_data: ConfigDocument::new(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCall {
    pub organization: String,
    pub integration_id: String,
    pub document: ConfigDocument,
}

/// Serves `pages` by cursor: no cursor is page 0, otherwise the page after
/// the one whose `next_cursor` matches.
#[derive(Default)]
pub struct FakeClient {
    pages: Vec<Page>,
    list_calls: Mutex<Vec<(String, String, Option<String>)>>,
    update_calls: Mutex<Vec<UpdateCall>>,
    list_failure: Mutex<Option<(usize, RemoteError)>>,
    update_failure: Mutex<Option<RemoteError>>,
}

impl FakeClient {
    pub fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing_list_at(self, page_index: usize, err: RemoteError) -> Self {
        *self.list_failure.lock().unwrap() = Some((page_index, err));
        self
    }

    pub fn failing_update(self, err: RemoteError) -> Self {
        *self.update_failure.lock().unwrap() = Some(err);
        self
    }

    pub fn list_cursors(&self) -> Vec<Option<String>> {
        self.list_calls.lock().unwrap().iter().map(|(_, _, c)| c.clone()).collect()
    }

    pub fn list_filters(&self) -> Vec<(String, String)> {
        self.list_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(org, key, _)| (org.clone(), key.clone()))
            .collect()
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn updates(&self) -> Vec<UpdateCall> {
        self.update_calls.lock().unwrap().clone()
    }

    fn page_index(&self, cursor: Option<&str>) -> usize {
        match cursor {
            None => 0,
            Some(cursor) => self
                .pages
                .iter()
                .position(|p| p.next_cursor.as_deref() == Some(cursor))
                .map(|i| i + 1)
                .unwrap_or(self.pages.len()),
        }
    }
}

impl IntegrationClient for FakeClient {
    fn list(&self, organization: &str, provider_key: &str, cursor: Option<&str>) -> Result<Page, RemoteError> {
        self.list_calls.lock().unwrap().push((
            organization.to_string(),
            provider_key.to_string(),
            cursor.map(str::to_string),
        ));

        let index = self.page_index(cursor);
        let mut failure = self.list_failure.lock().unwrap();
        if failure.as_ref().is_some_and(|(at, _)| *at == index)
            && let Some((_, err)) = failure.take()
        {
            return Err(err);
        }

        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    fn update_config(
        &self,
        organization: &str,
        integration_id: &str,
        document: &ConfigDocument,
    ) -> Result<RemoteIntegration, RemoteError> {
        self.update_calls.lock().unwrap().push(UpdateCall {
            organization: organization.to_string(),
            integration_id: integration_id.to_string(),
            document: document.clone(),
        });

        if let Some(err) = self.update_failure.lock().unwrap().take() {
            return Err(err);
        }

        Ok(RemoteIntegration {
            id: integration_id.to_string(),
            provider_key: String::new(),
            name: String::new(),
            config_data: document.clone(),
        })
    }
}
