pub mod builder;
pub mod constant;
pub mod context;
pub mod error;
pub mod fixtures;

pub use builder::TestBuilder;
pub use context::TestContext;
pub use error::TestError;

pub mod prelude {
    pub use crate::{
        constant::{TEST_ACCESS_TOKEN, TEST_USER_AGENT},
        fixtures::eve::factory,
        TestBuilder, TestContext, TestError,
    };
}
