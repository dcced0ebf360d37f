//! Order lifecycle service.

use common::{OrderId, OrderStatus};
use store::{ItemStore, OrderStore};
use user_directory::UserDirectory;

use crate::enrichment::UserEnricher;
use crate::error::DomainError;
use crate::item::ItemService;

use super::{CreateOrder, LineRequest, Order, OrderLineBuilder, OrderResponse, UpdateOrder};

/// Service for managing orders.
///
/// The only writer of order state. Every write goes through the store as a
/// single `save` of the whole aggregate, so a failure before that call
/// leaves the stored order untouched. Every returned order is passed through
/// user enrichment, which never fails the operation.
pub struct OrderService<S, U>
where
    S: OrderStore + ItemStore + Clone,
    U: UserDirectory,
{
    store: S,
    lines: OrderLineBuilder<S>,
    enricher: UserEnricher<U>,
}

impl<S, U> OrderService<S, U>
where
    S: OrderStore + ItemStore + Clone,
    U: UserDirectory,
{
    /// Creates a new order service over the given store and user directory.
    pub fn new(store: S, directory: U) -> Self {
        Self {
            lines: OrderLineBuilder::new(ItemService::new(store.clone())),
            store,
            enricher: UserEnricher::new(directory),
        }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns a reference to the user enricher.
    pub fn enricher(&self) -> &UserEnricher<U> {
        &self.enricher
    }

    /// Creates an order with the requested lines and confirms it.
    ///
    /// Fails with `ItemNotFound` if any referenced item is missing, in which
    /// case nothing is persisted.
    #[tracing::instrument(skip(self, cmd), fields(user_id = %cmd.user_id, line_count = cmd.lines.len()))]
    pub async fn create_order(&self, cmd: CreateOrder) -> Result<OrderResponse, DomainError> {
        if !cmd.user_id.is_valid() {
            return Err(DomainError::invalid(format!(
                "user id must be positive, got {}",
                cmd.user_id
            )));
        }
        ensure_lines(&cmd.lines)?;

        let mut order = Order::new(cmd.user_id);
        let lines = self.lines.build_order_lines(&cmd.lines).await?;
        order.attach_lines(lines);
        order.confirm()?;

        let saved = Order::from(self.store.save(order.into_record()).await?);

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = saved.id().map(|id| id.as_i64()), "order created");

        Ok(self.respond(&saved).await)
    }

    /// Loads a single order.
    #[tracing::instrument(skip(self))]
    pub async fn get_order_by_id(&self, id: OrderId) -> Result<OrderResponse, DomainError> {
        ensure_id(id)?;

        let order = self
            .store
            .find_by_id(id)
            .await?
            .map(Order::from)
            .ok_or(DomainError::OrderNotFound(id))?;

        Ok(self.respond(&order).await)
    }

    /// Loads every existing order among `ids`; unknown ids are skipped.
    #[tracing::instrument(skip(self, ids), fields(requested = ids.len()))]
    pub async fn get_orders_by_ids(
        &self,
        ids: &[OrderId],
    ) -> Result<Vec<OrderResponse>, DomainError> {
        let records = self.store.find_all_by_id(ids).await?;
        Ok(self.respond_all(records.into_iter().map(Order::from)).await)
    }

    /// Loads every order in the given status.
    #[tracing::instrument(skip(self))]
    pub async fn get_orders_by_status(
        &self,
        status: OrderStatus,
    ) -> Result<Vec<OrderResponse>, DomainError> {
        let records = self.store.find_by_status(status).await?;
        Ok(self.respond_all(records.into_iter().map(Order::from)).await)
    }

    /// Replaces the full line set of an order and confirms it.
    ///
    /// If an item cannot be resolved the stored order is left as it was.
    #[tracing::instrument(skip(self, cmd), fields(order_id = %cmd.order_id, line_count = cmd.lines.len()))]
    pub async fn update_order_by_id(&self, cmd: UpdateOrder) -> Result<OrderResponse, DomainError> {
        ensure_id(cmd.order_id)?;
        ensure_lines(&cmd.lines)?;

        let mut order = self
            .store
            .find_by_id(cmd.order_id)
            .await?
            .map(Order::from)
            .ok_or(DomainError::OrderNotFound(cmd.order_id))?;

        // Working on a loaded copy; nothing reaches the store until save
        order.clear_lines();
        let lines = self.lines.build_order_lines(&cmd.lines).await?;
        order.attach_lines(lines);
        order.confirm()?;

        let saved = Order::from(self.store.save(order.into_record()).await?);

        metrics::counter!("orders_updated_total").increment(1);
        tracing::info!(order_id = cmd.order_id.as_i64(), "order updated");

        Ok(self.respond(&saved).await)
    }

    /// Deletes an order together with its lines.
    ///
    /// A missing id is an `InvalidArgument`; an id with no order behind it is
    /// `OrderNotFound`. Neither case deletes anything.
    #[tracing::instrument(skip(self))]
    pub async fn delete_order_by_id(&self, id: Option<OrderId>) -> Result<(), DomainError> {
        let id = id.ok_or_else(|| DomainError::invalid("ID can't be null"))?;
        ensure_id(id)?;

        if !self.store.exists_by_id(id).await? {
            return Err(DomainError::OrderNotFound(id));
        }
        self.store.delete_by_id(id).await?;

        metrics::counter!("orders_deleted_total").increment(1);
        tracing::info!(order_id = id.as_i64(), "order deleted");
        Ok(())
    }

    async fn respond(&self, order: &Order) -> OrderResponse {
        self.enricher.attach_user(OrderResponse::from(order)).await
    }

    /// Enriches orders one at a time, in order.
    async fn respond_all(&self, orders: impl Iterator<Item = Order>) -> Vec<OrderResponse> {
        let mut responses = Vec::new();
        for order in orders {
            responses.push(self.respond(&order).await);
        }
        responses
    }
}

fn ensure_id(id: OrderId) -> Result<(), DomainError> {
    if id.is_valid() {
        Ok(())
    } else {
        Err(DomainError::invalid(format!(
            "order id must be positive, got {id}"
        )))
    }
}

fn ensure_lines(lines: &[LineRequest]) -> Result<(), DomainError> {
    if lines.is_empty() {
        return Err(DomainError::invalid("order must contain at least one item"));
    }
    Ok(())
}
