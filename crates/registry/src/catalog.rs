//! Built-in service catalog.
//!
//! Pure configuration data: four business services with their functions and
//! parameter schemas. Icon references are symbolic tags resolved by the
//! presentation layer.

use mocktty_types::{
    DisplayMode, FunctionDefinition, IconKind, ParamDefinition, ParamKind, ServiceDefinition,
};

fn param(id: &str, name: &str, kind: ParamKind) -> ParamDefinition {
    ParamDefinition {
        id: id.into(),
        name: name.into(),
        kind,
        options: Vec::new(),
        default_value: None,
    }
}

fn param_with_default(id: &str, name: &str, kind: ParamKind, default: &str) -> ParamDefinition {
    ParamDefinition {
        default_value: Some(default.into()),
        ..param(id, name, kind)
    }
}

fn select_param(id: &str, name: &str, options: &[&str], default: &str) -> ParamDefinition {
    ParamDefinition {
        options: options.iter().map(|option| (*option).into()).collect(),
        default_value: Some(default.into()),
        ..param(id, name, ParamKind::Select)
    }
}

/// The full built-in catalog, in display order.
pub fn builtin_services() -> Vec<ServiceDefinition> {
    vec![
        ServiceDefinition {
            id: "user".into(),
            name: "用户服务".into(),
            icon: IconKind::Users,
            functions: vec![
                FunctionDefinition {
                    id: "login".into(),
                    name: "用户登录".into(),
                    params: vec![
                        param_with_default("username", "用户名", ParamKind::Text, "admin"),
                        param("password", "密码", ParamKind::Password),
                    ],
                    auto_execute: false,
                    display_mode: DisplayMode::Json,
                },
                FunctionDefinition {
                    id: "register".into(),
                    name: "用户注册".into(),
                    params: vec![
                        param("username", "用户名", ParamKind::Text),
                        param("password", "密码", ParamKind::Password),
                        param_with_default("email", "邮箱", ParamKind::Email, "user@example.com"),
                    ],
                    auto_execute: false,
                    display_mode: DisplayMode::Json,
                },
                FunctionDefinition {
                    id: "profile".into(),
                    name: "用户信息".into(),
                    params: vec![param_with_default("userId", "用户ID", ParamKind::Text, "1001")],
                    auto_execute: true,
                    display_mode: DisplayMode::Json,
                },
            ],
        },
        ServiceDefinition {
            id: "order".into(),
            name: "订单服务".into(),
            icon: IconKind::ShoppingCart,
            functions: vec![
                FunctionDefinition {
                    id: "create".into(),
                    name: "创建订单".into(),
                    params: vec![
                        param_with_default("userId", "用户ID", ParamKind::Text, "1001"),
                        param_with_default("productId", "产品ID", ParamKind::Text, "P2001"),
                        param_with_default("quantity", "数量", ParamKind::Number, "1"),
                    ],
                    auto_execute: false,
                    display_mode: DisplayMode::Json,
                },
                FunctionDefinition {
                    id: "query".into(),
                    name: "查询订单".into(),
                    params: vec![param_with_default("orderId", "订单ID", ParamKind::Text, "ORD-2023-001")],
                    auto_execute: true,
                    display_mode: DisplayMode::Table,
                },
                FunctionDefinition {
                    id: "cancel".into(),
                    name: "取消订单".into(),
                    params: vec![param("orderId", "订单ID", ParamKind::Text)],
                    auto_execute: false,
                    display_mode: DisplayMode::Json,
                },
            ],
        },
        ServiceDefinition {
            id: "product".into(),
            name: "产品服务".into(),
            icon: IconKind::Database,
            functions: vec![
                FunctionDefinition {
                    id: "list".into(),
                    name: "产品列表".into(),
                    params: vec![
                        param_with_default("page", "页码", ParamKind::Number, "1"),
                        param_with_default("size", "每页数量", ParamKind::Number, "10"),
                    ],
                    auto_execute: true,
                    display_mode: DisplayMode::Table,
                },
                FunctionDefinition {
                    id: "detail".into(),
                    name: "产品详情".into(),
                    params: vec![param_with_default("productId", "产品ID", ParamKind::Text, "P2001")],
                    auto_execute: false,
                    display_mode: DisplayMode::Json,
                },
            ],
        },
        ServiceDefinition {
            id: "analytics".into(),
            name: "数据分析".into(),
            icon: IconKind::BarChart,
            functions: vec![
                FunctionDefinition {
                    id: "sales".into(),
                    name: "销售分析".into(),
                    params: vec![
                        param_with_default("startDate", "开始日期", ParamKind::Date, "2023-01-01"),
                        param_with_default("endDate", "结束日期", ParamKind::Date, "2023-12-31"),
                    ],
                    auto_execute: false,
                    display_mode: DisplayMode::Json,
                },
                FunctionDefinition {
                    id: "users".into(),
                    name: "用户分析".into(),
                    params: vec![select_param("period", "时间段", &["日", "周", "月", "年"], "月")],
                    auto_execute: true,
                    display_mode: DisplayMode::Json,
                },
            ],
        },
    ]
}
