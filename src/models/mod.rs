pub mod fundamentals;
pub mod quotes;
pub mod report;
pub mod stream;

pub use fundamentals::{FinancialStatement, Frequency, Period, StatementType};
pub use quotes::{PriceQuote, PriceSnapshot, StockPrice};
pub use report::{FinancialReport, DEFAULT_LIMIT};
pub use stream::{StreamEvent, StreamEventKind, ThreadCreated, ThreadState};
