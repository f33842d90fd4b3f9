//! Test fixtures: feed items, feed pages, and engine completions.

use geofeed_core::{FeedItem, ItemId};
use serde_json::{json, Value};

pub const CREATE_TIME: &str = "2025-01-06 09:31:02";

pub fn item(id: ItemId, rich_text: &str) -> FeedItem {
    FeedItem::new(id, rich_text, CREATE_TIME)
}

/// A realistic page mixing place-named, financial, and placeless items.
pub fn sample_page() -> Vec<FeedItem> {
    vec![
        item(4412305, "<b>【美联储】</b>鲍威尔在华盛顿表示，通胀仍高于目标"),
        item(4412304, "沪金主力合约日内涨超2%，报620元/克"),
        item(4412303, "布伦特原油期货跌1.5%"),
        item(4412302, "某券商首席：关于价值投资的几点思考"),
    ]
}

/// `n` plain items with ids `1..=n`.
pub fn items(n: ItemId) -> Vec<FeedItem> {
    (1..=n).map(|id| item(id, &format!("快讯 {id}"))).collect()
}

/// Feed page body as served by the news source.
pub fn feed_page(items: &[FeedItem]) -> Value {
    json!({
        "result": {
            "status": {"code": 0, "msg": "succ"},
            "data": {
                "feed": {
                    "list": items,
                    "page_info": {"totalPage": 1, "pageSize": 60, "page": 1}
                }
            }
        }
    })
}

/// Chat-completions response carrying `content` as the first choice.
pub fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}
