pub(crate) mod helpers;

pub(crate) use context::{SETTLE, TestContext};
