//! Limit Order Book - demo driver
//!
//! Replays a short scripted session against the public API and renders the
//! book after each step. Book logic lives entirely in the library.

use limit_order_book::{Book, BookError, Side};

fn print_book(book: &Book) {
    for side in [Side::Buy, Side::Sell] {
        println!("  {side} levels (in order):   {:?}", book.in_order(side));
        println!("  {side} levels (pre order):  {:?}", book.pre_order(side));
        for price in book.in_order(side) {
            if let Ok(limit) = book.find_limit(side, price) {
                println!("    {limit}");
            }
        }
    }
    println!(
        "  Edges: bid {:?}, ask {:?}, spread {:?}",
        book.best_bid(),
        book.best_ask(),
        book.spread()
    );
}

fn main() -> Result<(), BookError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("===========================================");
    println!("  Limit Order Book");
    println!("===========================================");

    let mut book = Book::with_capacity(64, 16);

    println!("\nAdding buy levels 20, 15, 25, 10, 17, 30, 35...");
    for (id, price) in [(1, 20), (2, 15), (3, 25), (4, 10), (5, 17), (6, 30), (7, 35)] {
        book.add_order(id, Side::Buy, 80, price)?;
    }
    println!("\nAdding sell orders 100@80, 30@80, 50@85...");
    book.add_order(101, Side::Sell, 100, 80)?;
    book.add_order(102, Side::Sell, 30, 80)?;
    book.add_order(103, Side::Sell, 50, 85)?;
    print_book(&book);

    println!("\nCancelling the best bid (order 7 @ 35)...");
    let cancelled = book.cancel_order(7)?;
    println!("  Cancelled: {cancelled}");
    print_book(&book);

    println!("\nMarket buy 150...");
    let execution = book.market_order(200, Side::Buy, 150)?;
    for fill in &execution.fills {
        println!(
            "  Fill: maker {} {} @ {}",
            fill.maker_order_id, fill.quantity, fill.price
        );
    }
    println!("  Filled {}, unfilled {}", execution.filled(), execution.unfilled());
    print_book(&book);

    if let Err(e) = book.cancel_order(999) {
        println!("\nCancel of unknown order rejected: {e}");
    }

    println!("\nState root: {}", book.state_root_hex()?);
    Ok(())
}
