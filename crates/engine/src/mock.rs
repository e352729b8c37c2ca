//! Synthetic envelope and row generation.
//!
//! The envelope shape mirrors what the real services are expected to return:
//! request metadata, echoed params, deep nesting, long filler strings, and a
//! fixed-size row array with service-specific columns for the product and
//! order services. Values are intentionally drawn from `thread_rng` with no
//! seed; repeated runs must not produce identical content.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::rngs::ThreadRng;
use serde_json::{Map, Value, json};

use crate::{EngineError, MockRequest, ROW_COUNT};

const FILLER_SEGMENT: &str = "这是一段非常长的文本，用于测试水平滚动功能。";

/// Build the full response envelope for one simulated request.
pub fn build_envelope(request: &MockRequest) -> Result<Value, EngineError> {
    let mut rng = rand::thread_rng();
    let now = Utc::now();

    let mut data = Map::new();
    data.insert("id".into(), json!(rng.gen_range(0..1000u32)));
    data.insert("timestamp".into(), json!(now.timestamp_millis()));
    for (key, value) in &request.params {
        data.insert(key.clone(), value.clone());
    }
    data.insert("extraLongData".into(), json!(FILLER_SEGMENT.repeat(10)));
    data.insert(
        "nestedData".into(),
        json!({
            "level1": { "level2": { "level3": { "level4": { "level5": "深层嵌套数据" } } } }
        }),
    );
    let rows: Vec<Value> = (0..ROW_COUNT)
        .map(|index| synthetic_row(&request.service_id, index, now, &mut rng))
        .collect();
    data.insert("arrayData".into(), Value::Array(rows));

    Ok(json!({
        "success": true,
        "requestTime": iso(now),
        "server": request.server_address,
        "service": request.service_name,
        "function": request.function_name,
        "params": request.params,
        "result": {
            "code": 200,
            "message": "操作成功",
            "data": data,
        }
    }))
}

/// One synthetic row: the generic base columns plus service-specific extras.
fn synthetic_row(service_id: &str, index: usize, now: DateTime<Utc>, rng: &mut ThreadRng) -> Value {
    let i = index as i64;
    let status = ["成功", "处理中", "失败"][index % 3];
    let mut row = json!({
        "index": index,
        "id": format!("ID-{}", 1000 + index),
        "value": format!("测试数据 {index}"),
        "description": format!("这是第 {index} 项的详细描述信息，包含更多文本以测试单元格内容截断和提示。"),
        "status": status,
        "createTime": iso(now - Duration::days(i)),
        "updateTime": iso(now - Duration::hours(12 * i)),
        "amount": money(rng, 10_000),
        "quantity": rng.gen_range(1..=100u32),
        "price": money(rng, 100_000),
        "discount": money(rng, 50),
        "tax": money(rng, 1_700),
        "total": money(rng, 200_000),
        "currency": pick(rng, &["CNY", "USD", "EUR", "GBP", "JPY"]),
        "paymentMethod": pick(rng, &["支付宝", "微信", "银行卡", "现金", "信用卡"]),
        "deliveryMethod": pick(rng, &["快递", "自提", "同城配送", "国际物流"]),
        "customerName": format!("客户 {index}"),
        "customerPhone": phone(rng),
        "customerEmail": format!("customer{index}@example.com"),
        "customerAddress": format!("测试地址 {index}，测试城市，测试省份，测试国家"),
        "notes": format!("这是一段非常长的备注信息，用于测试表格的横向滚动功能。包含了很多额外的文本内容，确保能够触发横向滚动条。{index}"),
        "tags": tags(rng),
        "priority": pick(rng, &["高", "中", "低"]),
        "department": pick(rng, &["销售部", "技术部", "客服部", "财务部"]),
        "operator": format!("操作员 {}", rng.gen_range(1..=100u32)),
        "approver": format!("审批人 {}", rng.gen_range(1..=50u32)),
        "approvalStatus": pick(rng, &["已批准", "待批准", "已拒绝"]),
        "approvalTime": iso(now - Duration::hours(36 * i)),
        "extraField1": format!("额外字段 1 - {index}"),
        "extraField2": format!("额外字段 2 - {index}"),
        "extraField3": format!("额外字段 3 - {index}"),
        "extraField4": format!("额外字段 4 - {index}"),
        "extraField5": format!("额外字段 5 - {index}"),
    });

    if let Value::Object(map) = &mut row {
        match service_id {
            "product" => extend_product(map, index, now, rng),
            "order" => extend_order(map, index, rng),
            _ => {}
        }
    }
    row
}

fn extend_product(map: &mut Map<String, Value>, index: usize, now: DateTime<Utc>, rng: &mut ThreadRng) {
    let i = index as i64;
    map.insert("productCode".into(), json!(format!("P{}", 1000 + index)));
    map.insert("productName".into(), json!(format!("产品名称 {index}")));
    map.insert(
        "category".into(),
        json!(pick(rng, &["电子产品", "家居用品", "食品", "服装", "图书"])),
    );
    map.insert("brand".into(), json!(format!("品牌 {}", rng.gen_range(1..=20u32))));
    map.insert("supplier".into(), json!(format!("供应商 {}", rng.gen_range(1..=10u32))));
    map.insert("stockQuantity".into(), json!(rng.gen_range(0..1000u32)));
    map.insert("unit".into(), json!(pick(rng, &["个", "箱", "套", "件", "千克"])));
    map.insert("specifications".into(), json!(format!("规格信息 {index}")));
    map.insert("productionDate".into(), json!(iso(now - Duration::days(30 * i))));
    map.insert("expiryDate".into(), json!(iso(now + Duration::days(30 * i))));
    map.insert("shelfLife".into(), json!(format!("{} 个月", rng.gen_range(1..=36u32))));
    map.insert(
        "storageConditions".into(),
        json!(pick(rng, &["常温", "冷藏", "冷冻", "避光"])),
    );
}

fn extend_order(map: &mut Map<String, Value>, index: usize, rng: &mut ThreadRng) {
    map.insert("orderNumber".into(), json!(format!("ORD-2023-{}", 1000 + index)));
    map.insert(
        "orderType".into(),
        json!(pick(rng, &["普通订单", "批发订单", "预售订单", "定制订单"])),
    );
    map.insert(
        "orderStatus".into(),
        json!(pick(rng, &["待付款", "已付款", "已发货", "已完成", "已取消"])),
    );
    map.insert(
        "paymentStatus".into(),
        json!(pick(rng, &["未支付", "部分支付", "已支付", "已退款"])),
    );
    map.insert(
        "deliveryStatus".into(),
        json!(pick(rng, &["未发货", "已发货", "已签收", "已退货"])),
    );
    map.insert(
        "deliveryCompany".into(),
        json!(pick(rng, &["顺丰", "圆通", "中通", "申通", "韵达"])),
    );
    map.insert(
        "trackingNumber".into(),
        json!(format!("SF{}", rng.gen_range(0..1_000_000_000u64))),
    );
    map.insert(
        "deliveryAddress".into(),
        json!(format!("配送地址 {index}，测试城市，测试省份，测试国家")),
    );
    map.insert("recipientName".into(), json!(format!("收件人 {index}")));
    map.insert("recipientPhone".into(), json!(phone(rng)));
    map.insert(
        "invoiceType".into(),
        json!(pick(rng, &["普通发票", "增值税发票", "电子发票", "无需发票"])),
    );
    map.insert("invoiceTitle".into(), json!(format!("发票抬头 {index}")));
    map.insert("invoiceContent".into(), json!(format!("发票内容 {index}")));
    map.insert("invoiceAmount".into(), json!(money(rng, 200_000)));
    map.insert(
        "orderSource".into(),
        json!(pick(rng, &["网站", "APP", "微信小程序", "电话", "线下"])),
    );
    let promotion = rng
        .gen_bool(0.5)
        .then(|| format!("PROMO{}", rng.gen_range(0..10_000u32)));
    map.insert("promotionCode".into(), json!(promotion));
    map.insert("giftWrapping".into(), json!(rng.gen_bool(0.3)));
    let gift_message = rng.gen_bool(0.3).then(|| format!("礼品留言 {index}"));
    map.insert("giftMessage".into(), json!(gift_message));
}

fn iso(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Random amount with two decimal places, up to `max_cents / 100`.
fn money(rng: &mut ThreadRng, max_cents: u64) -> f64 {
    rng.gen_range(0..=max_cents) as f64 / 100.0
}

fn phone(rng: &mut ThreadRng) -> String {
    format!("1{}", rng.gen_range(0..10_000_000_000u64))
}

fn tags(rng: &mut ThreadRng) -> Value {
    let all = ["标签A", "标签B", "标签C", "标签D", "标签E"];
    let count = rng.gen_range(1..=all.len());
    json!(all[..count].to_vec())
}

fn pick<'a>(rng: &mut ThreadRng, options: &[&'a str]) -> &'a str {
    options[rng.gen_range(0..options.len())]
}
