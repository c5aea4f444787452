#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod autodiff;
mod entities;
