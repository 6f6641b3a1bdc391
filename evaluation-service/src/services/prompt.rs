//! Prompt templates and variable substitution.
//!
//! Template text normally comes from the prompt registry; the embedded
//! defaults below serve deployments that run with the registry disabled.

use super::langfuse::{LangfuseError, PromptRegistry};
use super::secrets::SecretBundle;
use async_trait::async_trait;

pub const EVALUATION_PROMPT_NAME: &str = "output_evaluation";
pub const EVALUATION_RUN_NAME: &str = "Output Evaluation";
pub const TWEET_PROMPT_NAME: &str = "tweet_generation";
pub const TWEET_RUN_NAME: &str = "Tweet Generation";

const EVALUATION_TEMPLATE: &str = r#"あなたはAWS社のソリューションアーキテクトです。以下のブログのAWSレベルを判定してください。
ただし、もしブログ内容のテキストではなく、単一のURLが入力された場合は
「URLの読み込みには対応していません。内容をコピペして送信してね🙏」と返してください。

<評価基準>
Level 100 : AWS サービスの概要を解説するレベル
Level 200 : トピックの入門知識を持っていることを前提に、ベストプラクティス、サービス機能を解説するレベル
Level 300 : 対象のトピックの詳細を解説するレベル
Level 400 : 複数のサービス、アーキテクチャによる実装でテクノロジーがどのように機能するかを解説するレベル
</評価基準>

<ブログ>
{{blog_content}}"#;

const TWEET_TEMPLATE: &str = r#"以下は、このアプリの利用者が自分の技術アウトプットを評価した結果です。
これをXでつぶやいてアプリの利用拡大につながるよう、100文字以内のツイート文言にまとめてください。

<評価結果>
{{eval_result}}
</評価結果>

以下の例に沿って、なるべく xxx の部分だけを変更してください。

<ツイート文言の例>
#AWSレベル判定くん でxxxに関するアウトプットを評価してみたら、Level xxxでした！ みんなも使ってみてね。
https://checker.minoruonda.com/
</ツイート文言の例>

ただし「はい、分かりました。ツイート文言を生成します」といった前置きは不要です。
ツイート文言そのものだけを出力してください。"#;

/// A named template with a single `{{variable}}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: String,
    /// Registry version; embedded defaults carry none.
    pub version: Option<i64>,
    pub text: String,
}

impl PromptTemplate {
    pub fn embedded(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            version: None,
            text: text.to_string(),
        }
    }

    /// Substitute the named placeholder. Placeholders with other names are
    /// left intact.
    pub fn render(&self, variable: &str, value: &str) -> String {
        self.text.replace(&format!("{{{{{}}}}}", variable), value)
    }
}

pub fn embedded_template(name: &str) -> Option<PromptTemplate> {
    match name {
        EVALUATION_PROMPT_NAME => Some(PromptTemplate::embedded(name, EVALUATION_TEMPLATE)),
        TWEET_PROMPT_NAME => Some(PromptTemplate::embedded(name, TWEET_TEMPLATE)),
        _ => None,
    }
}

/// Registry backend serving the embedded defaults.
pub struct EmbeddedPrompts;

#[async_trait]
impl PromptRegistry for EmbeddedPrompts {
    async fn fetch_prompt(
        &self,
        _credentials: &SecretBundle,
        name: &str,
    ) -> Result<PromptTemplate, LangfuseError> {
        embedded_template(name)
            .ok_or_else(|| LangfuseError::Parse(format!("unknown prompt template: {}", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_the_placeholder() {
        let template = PromptTemplate::embedded("t", "before {{blog_content}} after");
        assert_eq!(
            template.render("blog_content", "BODY"),
            "before BODY after"
        );
    }

    #[test]
    fn render_leaves_unknown_placeholders_intact() {
        let template = PromptTemplate::embedded("t", "{{other}} {{blog_content}}");
        assert_eq!(
            template.render("blog_content", "BODY"),
            "{{other}} BODY"
        );
    }

    #[test]
    fn embedded_evaluation_template_carries_the_grading_scale() {
        let template = embedded_template(EVALUATION_PROMPT_NAME).unwrap();
        assert!(template.text.contains("Level 100"));
        assert!(template.text.contains("Level 400"));
        assert!(template.text.contains("{{blog_content}}"));
        assert!(template.version.is_none());
    }

    #[test]
    fn embedded_tweet_template_substitutes_the_result() {
        let template = embedded_template(TWEET_PROMPT_NAME).unwrap();
        let rendered = template.render("eval_result", "Level 300でした");
        assert!(rendered.contains("Level 300でした"));
        assert!(!rendered.contains("{{eval_result}}"));
    }

    #[test]
    fn unknown_template_name_is_none() {
        assert!(embedded_template("missing").is_none());
    }
}
