//! 核心模块 - 配置、共享状态和 HTTP 服务器
//!
//! # 模块结构
//!
//! - [`Config`] - 环境变量配置
//! - [`ServerState`] - 所有处理器共享的状态
//! - [`Server`] - HTTP 服务器

pub mod config;
pub mod server;
pub mod state;

pub use config::{AdminBootstrap, Config};
pub use server::Server;
pub use state::ServerState;
