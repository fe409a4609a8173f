use error_stack::Report;
use kernel::interface::database::DatabaseConnection;
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{
    BookId, BookSnapshot, OrderItem, OrderItemId, OrderQuantity, OrderTotal,
};
use kernel::KernelError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::service::ensure_active;
use crate::service::work::UnitOfWork;

/// Prices each line from the book as read in the step that deducts it.
pub(crate) async fn deduct_lines<S>(
    service: &S,
    token: &CancellationToken,
    work: &mut UnitOfWork<'_, S::DatabaseConnection>,
    lines: &[(BookId, OrderQuantity)],
) -> error_stack::Result<Vec<OrderItem>, KernelError>
where
    S: ?Sized + DependOnBookQuery + DependOnBookModifier,
{
    let mut items = Vec::with_capacity(lines.len());
    let mut total = OrderTotal::default();
    for (book_id, quantity) in lines {
        ensure_active(token)?;
        let mut step = work.step().await?;
        let book = service
            .book_query()
            .find_by_id(&mut step, book_id)
            .await?
            .ok_or_else(|| Report::new(KernelError::not_found("Book", book_id.as_ref())))?;
        let item = OrderItem::new(
            OrderItemId::new(Uuid::new_v4()),
            book_id.clone(),
            *quantity,
            BookSnapshot::from(&book),
        );
        total = total.accumulate(&item)?;
        let deducted = book.deduct(quantity)?;
        service.book_modifier().update(&mut step, &deducted).await?;
        step.finish().await?;

        tracing::debug!(
            book_id = %book_id.as_ref(),
            quantity = quantity.as_ref(),
            remaining = deducted.stock().as_ref(),
            "Deducted stock"
        );
        items.push(item);
    }
    Ok(items)
}

/// Books that no longer exist are skipped.
pub(crate) async fn restock_items<S>(
    service: &S,
    token: &CancellationToken,
    con: &mut <S::DatabaseConnection as DatabaseConnection>::Transaction,
    items: &[OrderItem],
) -> error_stack::Result<(), KernelError>
where
    S: ?Sized + DependOnBookQuery + DependOnBookModifier,
{
    for item in items {
        ensure_active(token)?;
        match service.book_query().find_by_id(con, item.book_id()).await? {
            Some(book) => {
                let restocked = book.restock(item.quantity())?;
                service.book_modifier().update(con, &restocked).await?;
                tracing::debug!(
                    book_id = %item.book_id().as_ref(),
                    quantity = item.quantity().as_ref(),
                    "Restocked"
                );
            }
            None => tracing::warn!(
                book_id = %item.book_id().as_ref(),
                "Book no longer exists, nothing to restock"
            ),
        }
    }
    Ok(())
}
