//! Daily specials operations

use tracing::{debug, info};

use crate::api_client::ApiClient;
use crate::error::{ClientError, Result};
use crate::request::{ImageUpload, MultipartForm, RequestBody};
use crate::types::{ActiveSpecials, DailySpecial, DashboardStats, Paginated, ToggleResponse};

const SPECIALS_PATH: &str = "/menu/daily-specials/";
const ACTIVE_SPECIALS_PATH: &str = "/menu/daily-specials/active/";

/// Number of specials listed on the dashboard
const RECENT_LIMIT: usize = 5;

fn special_path(id: u64) -> String {
    format!("{SPECIALS_PATH}{id}/")
}

/// Fields of a new daily special
#[derive(Debug, Clone)]
pub struct NewDailySpecial {
    pub name: String,
    pub description: String,
    /// Decimal price, kept as text
    pub price: String,
    pub image: Option<ImageUpload>,
}

impl NewDailySpecial {
    fn to_form(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("name", self.name.clone())
            .text("description", self.description.clone())
            .text("price", self.price.clone());

        match &self.image {
            Some(image) => form.file("image", image.clone()),
            None => form,
        }
    }
}

/// Partial update; only the fields that are set are sent
#[derive(Debug, Clone, Default)]
pub struct DailySpecialPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<ImageUpload>,
    pub is_active: Option<bool>,
}

impl DailySpecialPatch {
    fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new();
        if let Some(name) = &self.name {
            form = form.text("name", name.clone());
        }
        if let Some(description) = &self.description {
            form = form.text("description", description.clone());
        }
        if let Some(price) = &self.price {
            form = form.text("price", price.clone());
        }
        if let Some(image) = &self.image {
            form = form.file("image", image.clone());
        }
        if let Some(is_active) = self.is_active {
            form = form.text("is_active", is_active.to_string());
        }
        form
    }
}

/// Typed access to the daily specials endpoints
#[derive(Clone)]
pub struct SpecialsClient {
    api: ApiClient,
}

impl SpecialsClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// One page of specials, pages start at 1
    pub async fn list(&self, page: u32) -> Result<Paginated<DailySpecial>> {
        self.api
            .get(SPECIALS_PATH, &[("page", page.max(1).to_string())])
            .await
    }

    pub async fn list_active(&self) -> Result<ActiveSpecials> {
        self.api.get(ACTIVE_SPECIALS_PATH, &[]).await
    }

    /// Every special, following pagination until the last page
    pub async fn list_all(&self) -> Result<Vec<DailySpecial>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.list(page).await?;
            let done = !batch.has_next() || batch.results.is_empty();
            all.extend(batch.results);
            if done {
                break;
            }
            page += 1;
        }

        debug!(pages = page, total = all.len(), "Fetched all specials");
        Ok(all)
    }

    pub async fn create(&self, special: &NewDailySpecial) -> Result<DailySpecial> {
        let created: DailySpecial = self
            .api
            .post(SPECIALS_PATH, RequestBody::Multipart(special.to_form()))
            .await?;
        info!(id = created.id, name = %created.name, "Created daily special");
        Ok(created)
    }

    pub async fn update(&self, id: u64, patch: &DailySpecialPatch) -> Result<DailySpecial> {
        let form = patch.to_form();
        if form.is_empty() {
            return Err(ClientError::InvalidRequest(
                "Nothing to update: no fields set".to_string(),
            ));
        }

        let updated: DailySpecial = self
            .api
            .patch(&special_path(id), RequestBody::Multipart(form))
            .await?;
        info!(id, "Updated daily special");
        Ok(updated)
    }

    /// Flip the active flag; returns the updated record
    pub async fn toggle_active(&self, id: u64) -> Result<DailySpecial> {
        let response: ToggleResponse = self
            .api
            .post(&format!("{}toggle_active/", special_path(id)), RequestBody::Empty)
            .await?;
        info!(id, is_active = response.data.is_active, "Toggled daily special");
        Ok(response.data)
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        self.api.delete(&special_path(id)).await?;
        info!(id, "Deleted daily special");
        Ok(())
    }

    /// Totals and the most recent specials across all pages
    pub async fn dashboard(&self) -> Result<DashboardStats> {
        let all = self.list_all().await?;
        Ok(DashboardStats::from_specials(all))
    }
}

impl DashboardStats {
    pub fn from_specials(mut specials: Vec<DailySpecial>) -> Self {
        let total = specials.len();
        let active = specials.iter().filter(|s| s.is_active).count();

        specials.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        specials.truncate(RECENT_LIMIT);

        Self {
            total,
            active,
            inactive: total - active,
            recent: specials,
        }
    }
}
