mod book_sales;
mod id;
mod revenue;

pub use self::{book_sales::*, id::*, revenue::*};
use std::collections::BTreeMap;

use destructure::Destructure;
use vodca::References;

use crate::entity::{BookTitle, CreatedAt, Order, TimeWindow};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct SalesReport {
    id: SalesReportId,
    generated_at: CreatedAt<SalesReport>,
    window: TimeWindow,
    total_revenue: Revenue,
    total_orders: i64,
    books: Vec<BookSales>,
}

impl SalesReport {
    pub fn new(
        id: SalesReportId,
        generated_at: CreatedAt<SalesReport>,
        window: TimeWindow,
        total_revenue: Revenue,
        total_orders: i64,
        books: Vec<BookSales>,
    ) -> Self {
        Self {
            id,
            generated_at,
            window,
            total_revenue,
            total_orders,
            books,
        }
    }

    /// Books come out ordered by quantity sold, highest first, ties broken by id.
    pub fn summarize(
        id: SalesReportId,
        generated_at: CreatedAt<SalesReport>,
        window: TimeWindow,
        orders: &[Order],
    ) -> Self {
        let mut revenue = Revenue::default();
        let mut total_orders = 0;
        let mut per_book: BTreeMap<_, (BookTitle, i64)> = BTreeMap::new();
        for order in orders
            .iter()
            .filter(|order| window.contains(order.created_at().as_ref()))
        {
            revenue = revenue.add(order.total());
            total_orders += 1;
            for item in order.items() {
                let quantity = i64::from(*item.quantity().as_ref());
                per_book
                    .entry(item.book_id().clone())
                    .and_modify(|(_, sold)| *sold += quantity)
                    .or_insert_with(|| (item.snapshot().title().clone(), quantity));
            }
        }

        let mut books = per_book
            .into_iter()
            .map(|(book_id, (title, quantity))| BookSales::new(book_id, title, quantity))
            .collect::<Vec<_>>();
        books.sort_by(|a, b| {
            b.quantity()
                .cmp(a.quantity())
                .then_with(|| a.book_id().cmp(b.book_id()))
        });

        Self {
            id,
            generated_at,
            window,
            total_revenue: revenue,
            total_orders,
            books,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_orders == 0
    }
}
