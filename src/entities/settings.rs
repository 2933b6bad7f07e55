//! Settings singleton: one enforced row, coalescing partial updates.

use std::future::Future;

use crate::schemas::settings::{Settings, SettingsPatch, TtsEngine};

use super::SqliteStore;

pub trait SettingsStore: Send + Sync + 'static {
    /// Seed the singleton row when it does not exist yet. Idempotent.
    fn ensure_settings(
        &self,
        defaults: &Settings,
    ) -> impl Future<Output = Result<(), sqlx::Error>> + Send;

    fn get_settings(&self) -> impl Future<Output = Result<Settings, sqlx::Error>> + Send;

    /// Apply a partial update: each field replaces the stored value only when
    /// present and non-empty; everything else is left untouched. Returns the
    /// row as stored afterwards.
    fn update_settings(
        &self,
        patch: &SettingsPatch,
    ) -> impl Future<Output = Result<Settings, sqlx::Error>> + Send;
}

impl SettingsStore for SqliteStore {
    async fn ensure_settings(&self, defaults: &Settings) -> Result<(), sqlx::Error> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT OR IGNORE INTO settings (id, model, tts_engine, tts_voice, system_prompt, updated_at) \
             VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&defaults.model)
        .bind(defaults.tts_engine.as_str())
        .bind(&defaults.tts_voice)
        .bind(&defaults.system_prompt)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_settings(&self) -> Result<Settings, sqlx::Error> {
        let (model, tts_engine, tts_voice, system_prompt): (String, String, String, Option<String>) =
            sqlx::query_as(
                "SELECT model, tts_engine, tts_voice, system_prompt FROM settings WHERE id = 1",
            )
            .fetch_one(&self.pool)
            .await?;
        Ok(Settings {
            model,
            tts_engine: TtsEngine::parse(&tts_engine),
            tts_voice,
            system_prompt: system_prompt.filter(|p| !p.trim().is_empty()),
        })
    }

    async fn update_settings(&self, patch: &SettingsPatch) -> Result<Settings, sqlx::Error> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        sqlx::query(
            "UPDATE settings SET \
                 model         = COALESCE(NULLIF(TRIM(?1), ''), model), \
                 tts_engine    = COALESCE(NULLIF(TRIM(?2), ''), tts_engine), \
                 tts_voice     = COALESCE(NULLIF(TRIM(?3), ''), tts_voice), \
                 system_prompt = COALESCE(NULLIF(TRIM(?4), ''), system_prompt), \
                 updated_at    = ?5 \
             WHERE id = 1",
        )
        .bind(&patch.model)
        .bind(patch.tts_engine.map(TtsEngine::as_str))
        .bind(&patch.tts_voice)
        .bind(&patch.system_prompt)
        .bind(&updated_at)
        .execute(&self.pool)
        .await?;
        self.get_settings().await
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn defaults() -> Settings {
        Settings {
            model: "gpt-4o-mini".into(),
            tts_engine: TtsEngine::Openai,
            tts_voice: "alloy".into(),
            system_prompt: Some("be brief".into()),
        }
    }

    async fn store() -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.ensure_settings(&defaults()).await.unwrap();
        store
    }

    #[tokio::test]
    async fn ensure_is_idempotent() {
        let store = store().await;
        let mut other = defaults();
        other.model = "something-else".into();
        store.ensure_settings(&other).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap(), defaults());
    }

    #[tokio::test]
    async fn partial_update_leaves_other_fields_alone() {
        let store = store().await;
        let updated = store
            .update_settings(&SettingsPatch {
                tts_voice: Some("nova".into()),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.tts_voice, "nova");
        assert_eq!(updated.model, "gpt-4o-mini");
        assert_eq!(updated.system_prompt.as_deref(), Some("be brief"));
    }

    #[tokio::test]
    async fn empty_strings_count_as_absent() {
        let store = store().await;
        let updated = store
            .update_settings(&SettingsPatch {
                model: Some("  ".into()),
                tts_voice: Some(String::new()),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();
        assert_eq!(updated, defaults());
    }

    #[tokio::test]
    async fn engine_update_round_trips() {
        let store = store().await;
        let updated = store
            .update_settings(&SettingsPatch {
                tts_engine: Some(TtsEngine::Browser),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.tts_engine, TtsEngine::Browser);
    }
}
