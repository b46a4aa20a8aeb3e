// Like Aggregator: records likes (atomically bumping `like_count`) and joins a
// user's likes back to artifact documents.

pub mod aggregator;
pub mod handlers;
