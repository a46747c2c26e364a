use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::domain::review_tags::ReviewTags;

const MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 1000;

/// Tag vocabulary and output contract for the model. Carried verbatim as a
/// fixed constant; tuning it is out of scope.
const SYSTEM_PROMPT: &str = r#"
あなたは高度なテキスト解析を行うアシスタントです。
ユーザーがアップロードしたCSVの各行（レビュー）について、
7W2H（"Which" を除く: When, Where, Who, Why, How, How_much）と
ABC（Affect, Behavior, Cognition）のカテゴリを判定し、
必ずJSON形式で出力してください。

各フィールドは配列。該当なければ "[]" を返してください。
"none" という文字列は使わないでください。

カテゴリ定義:

1) 7W2H
- When: ["morning", "daytime", "night", "special_event"]
- Where: ["home", "restaurant_bar", "travel", "other_place"]
- Who: ["reviewer_self", "family", "friends", "partner", "other_who"]
- Why: ["celebration", "stress_relief", "everyday_consumption", "curiosity", "other_why"]
- How: ["hot", "cold", "room_temp", "with_meal", "other_how"]
- How_much: ["low_price", "mid_price", "high_price"]

2) ABC
- Affect: ["joy","surprise","relief","disappointment","other_affect"]
- Behavior: ["repeat_purchase","recommend_to_others","sns_share","other_behavior"]
- Cognition: ["taste_sweet","taste_dry","taste_acidic","taste_bitter",
              "aroma_fruity","aroma_rich","brand_rare","high_quality",
              "cost_performance","other_cognition"]

出力例:
{
  "When": [],
  "Where": [],
  "Who": [],
  "Why": [],
  "How": [],
  "How_much": [],
  "Affect": [],
  "Behavior": [],
  "Cognition": []
}
"#;

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
}

impl OpenaiClient {
    pub fn new(api_key: String) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
        }
    }

    /// One deterministic completion for one review row. Returns the raw model
    /// output; callers decide what an unparseable response means.
    pub async fn classify_review(&self, content: &str, taste: &str) -> anyhow::Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(MODEL)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(build_user_message(content, taste))
                    .build()?
                    .into(),
            ])
            .max_tokens(MAX_TOKENS)
            .temperature(0.0)
            .build()?;

        let response = self.client.chat().create(request).await?;

        let first_choice = response
            .choices
            .first()
            .ok_or_else(|| anyhow::anyhow!("No choices in Openai response"))?
            .message
            .content
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No content in Openai response"))?;

        Ok(first_choice)
    }
}

fn build_user_message(content: &str, taste: &str) -> String {
    format!(
        r#"
以下のレビュー本文とテイスト情報を参考に、上記カテゴリを分析してください。

【レビュー本文】
{content}

【テイスト情報】
{taste}

出力はJSON形式のみで、以下のフィールドを含めてください:
{{
  "When": [],
  "Where": [],
  "Who": [],
  "Why": [],
  "How": [],
  "How_much": [],
  "Affect": [],
  "Behavior": [],
  "Cognition": []
}}
"#
    )
}

/// The model output must be exactly the JSON tag object.
pub fn parse_tags(raw: &str) -> Result<ReviewTags, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_embeds_both_row_fields() {
        let message = build_user_message("冷やで飲んだ。最高。", "甘辛 やや甘口");
        assert!(message.contains("【レビュー本文】\n冷やで飲んだ。最高。"));
        assert!(message.contains("【テイスト情報】\n甘辛 やや甘口"));
    }

    #[test]
    fn parses_wellformed_model_output() {
        let tags = parse_tags(r#"{"How": ["cold"], "Affect": ["joy"]}"#).unwrap();
        assert_eq!(tags.how, vec!["cold"]);
        assert_eq!(tags.affect, vec!["joy"]);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert!(parse_tags("\n  {\"When\": []}  \n").is_ok());
    }

    #[test]
    fn rejects_prose_wrapped_json() {
        assert!(parse_tags("Here are the tags: {\"When\": []}").is_err());
    }
}
