//! Speech output and capture through external programs.
//!
//! `tts_command` receives the text to speak as its last argument.
//! `stt_command` must print one transcript line on stdout; it gets the
//! recognition language in `SAGE_LANGUAGE`.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use sage_chat::{ChatError, Listener, SilentSpeaker, Speaker, UnsupportedListener};
use sage_core::config::VoiceConfig;
use tokio::process::Command;

/// Split a configured command line into program and arguments.
pub fn parse_command(line: &str) -> Option<(String, Vec<String>)> {
    let mut parts = line.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Speaks by launching a text-to-speech program per utterance.
#[derive(Debug, Clone)]
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

#[async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<(), ChatError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ChatError::VoiceError(format!("failed to start {}: {e}", self.program)))?;

        // Playback is fire-and-forget; the reply is recorded without waiting for it.
        let program = self.program.clone();
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    tracing::warn!(program = %program, status = %status, "Speech program failed")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(program = %program, error = %e, "Speech program lost"),
            }
        });
        Ok(())
    }
}

/// Captures one utterance by running a speech-to-text program.
#[derive(Debug, Clone)]
pub struct CommandListener {
    program: String,
    args: Vec<String>,
    language: String,
}

impl CommandListener {
    pub fn new(program: String, args: Vec<String>, language: String) -> Self {
        Self {
            program,
            args,
            language,
        }
    }
}

#[async_trait]
impl Listener for CommandListener {
    fn is_available(&self) -> bool {
        true
    }

    async fn listen(&self) -> Result<String, ChatError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .env("SAGE_LANGUAGE", &self.language)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                ChatError::CaptureFailed(format!("failed to start {}: {e}", self.program))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ChatError::CaptureFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ChatError::CaptureFailed("no speech recognized".to_string()))
    }
}

/// Speaker for the configured voice settings.
pub fn build_speaker(config: &VoiceConfig, no_speech: bool) -> Arc<dyn Speaker> {
    if no_speech || !config.speech_enabled {
        tracing::info!("Speech output disabled");
        return Arc::new(SilentSpeaker);
    }
    match config.tts_command.as_deref().and_then(parse_command) {
        Some((program, args)) => {
            tracing::info!(program = %program, "Speech output enabled");
            Arc::new(CommandSpeaker::new(program, args))
        }
        None => {
            tracing::info!("No tts_command configured; replies are not spoken");
            Arc::new(SilentSpeaker)
        }
    }
}

/// Listener for the configured voice settings. Without `stt_command`
/// capture is unsupported.
pub fn build_listener(config: &VoiceConfig) -> Arc<dyn Listener> {
    match config.stt_command.as_deref().and_then(parse_command) {
        Some((program, args)) => {
            tracing::info!(program = %program, language = %config.language, "Speech capture enabled");
            Arc::new(CommandListener::new(program, args, config.language.clone()))
        }
        None => Arc::new(UnsupportedListener),
    }
}
