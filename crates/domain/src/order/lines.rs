//! Building order lines from item references.

use store::ItemStore;

use crate::error::DomainError;
use crate::item::ItemService;

use super::{LineRequest, OrderLine};

/// Resolves requested lines against the catalog and produces order lines.
///
/// Does not persist anything; the caller attaches the lines to an order and
/// saves the order as a whole.
#[derive(Clone)]
pub struct OrderLineBuilder<S: ItemStore> {
    items: ItemService<S>,
}

impl<S: ItemStore> OrderLineBuilder<S> {
    pub fn new(items: ItemService<S>) -> Self {
        Self { items }
    }

    /// Builds one line per request, in request order.
    ///
    /// Items are resolved one at a time. The first missing item fails the
    /// whole batch; no partial list is returned. Quantities are taken as
    /// given.
    #[tracing::instrument(skip(self, requests), fields(line_count = requests.len()))]
    pub async fn build_order_lines(
        &self,
        requests: &[LineRequest],
    ) -> Result<Vec<OrderLine>, DomainError> {
        let mut lines = Vec::with_capacity(requests.len());
        for request in requests {
            let item = self.items.get_item(request.item_id).await?;
            lines.push(OrderLine::new(&item, request.quantity));
        }
        Ok(lines)
    }
}
