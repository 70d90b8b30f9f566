//! Service catalog management

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        service::{ensure_price, CreateService, Service, UpdateService},
        user::RequestContext,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Service>> {
        self.repository.catalog.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Service> {
        self.repository.catalog.get_by_id(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, data: CreateService) -> AppResult<Service> {
        ctx.require_admin()?;
        data.validate()?;
        ensure_price(Some(data.price))?;
        let service = self.repository.catalog.create(&data).await?;
        tracing::info!("Service {} '{}' created by {:?}", service.id, service.name, ctx.user_id);
        Ok(service)
    }

    /// Price edits apply to future bookings; past ones keep their snapshot
    pub async fn update(&self, ctx: &RequestContext, id: i32, data: UpdateService) -> AppResult<Service> {
        ctx.require_admin()?;
        data.validate()?;
        ensure_price(data.price)?;
        let service = self.repository.catalog.update(id, &data).await?;
        tracing::info!("Service {} updated by {:?}", id, ctx.user_id);
        Ok(service)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        self.repository.catalog.delete(id).await?;
        tracing::info!("Service {} deleted by {:?}", id, ctx.user_id);
        Ok(())
    }
}
