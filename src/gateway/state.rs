//! Gateway 应用状态

use std::sync::Arc;

use crate::providers::Generator;

/// Gateway 应用状态
///
/// 启动时构造一次，请求间只读共享
#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn Generator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &dyn Generator {
        self.generator.as_ref()
    }
}
