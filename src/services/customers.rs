//! Customer management

use chrono::Local;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        customer::{CreateCustomer, Customer, UpdateCustomer},
        user::RequestContext,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CustomersService {
    repository: Repository,
}

impl CustomersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Customer>> {
        ctx.require_admin()?;
        self.repository.customers.list().await
    }

    pub async fn get(&self, ctx: &RequestContext, id: i32) -> AppResult<Customer> {
        ctx.require_admin()?;
        self.repository.customers.get_by_id(id).await
    }

    pub async fn create(&self, ctx: &RequestContext, data: CreateCustomer) -> AppResult<Customer> {
        ctx.require_admin()?;
        data.validate()?;
        let customer = self
            .repository
            .customers
            .create(&data, Local::now().naive_local())
            .await?;
        tracing::info!("Customer {} created by {:?}", customer.id, ctx.user_id);
        Ok(customer)
    }

    pub async fn update(&self, ctx: &RequestContext, id: i32, data: UpdateCustomer) -> AppResult<Customer> {
        ctx.require_admin()?;
        data.validate()?;
        let customer = self.repository.customers.update(id, &data).await?;
        tracing::info!("Customer {} updated by {:?}", id, ctx.user_id);
        Ok(customer)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i32) -> AppResult<()> {
        ctx.require_admin()?;
        self.repository.customers.delete(id).await?;
        tracing::info!("Customer {} deleted by {:?}", id, ctx.user_id);
        Ok(())
    }
}
