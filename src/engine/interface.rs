use async_trait::async_trait;

use crate::error::EngineResult;

/// Interface of an external translation engine.
///
/// Both calls return the engine's raw reply: `None` when the engine produced no
/// value at all. Substituting defaults for missing values is the adapter's job.
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Prepare the engine, optionally pointing it at a directory of models.
    async fn init(&self, models_path: Option<&str>) -> EngineResult<Option<String>>;

    /// Translate `text` from `source_lang` to `target_lang`.
    ///
    /// # Arguments
    /// * `text` - The text to translate
    /// * `source_lang` - Source language code, `"auto"` to let the engine decide
    /// * `target_lang` - Target language code
    async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> EngineResult<Option<String>>;

    /// Logical name the engine was resolved under.
    fn name(&self) -> &str;
}
