// Professional profile surface: the completeness scorer, the /me profile
// endpoints that embed it, and the typed talent search.

pub mod completeness;
pub mod handlers;
pub mod search;
