// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod feed;
pub mod stats;

pub use feed::{build_activity_feed, FeedLimits};
pub use stats::{compute_monthly_progress, dashboard_summary, pr_insights, summarize_prs};
