//! # Cashmatch Core
//!
//! Foundational types shared by the Cashmatch crates:
//!
//! - **Types**: [`Date`] and [`Frequency`]
//! - **Business Day Calendars**: holiday calendars, roll conventions and
//!   Excel-style business-day arithmetic
//!
//! ## Example
//!
//! ```rust
//! use cashmatch_core::prelude::*;
//!
//! let cal = BusinessDayCalendar::new("UK", std::iter::empty::<Date>());
//! let start = Date::from_ymd(2025, 1, 1).unwrap();
//! assert_eq!(cal.workday(start, 1), Date::from_ymd(2025, 1, 2).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::manual_div_ceil)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::trivially_copy_pass_by_ref)]

pub mod calendars;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayCalendar, BusinessDayConvention, Calendar, WeekendCalendar, WeekendMask,
    };
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency};
}

// Re-export commonly used types at crate root
pub use calendars::{BusinessDayCalendar, BusinessDayConvention, Calendar};
pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency};
