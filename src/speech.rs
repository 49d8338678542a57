use std::process::{Child, Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lang {
    English,
    Vietnamese,
}

impl Lang {
    pub fn tag(self) -> &'static str {
        match self {
            Lang::English => "en-US",
            Lang::Vietnamese => "vi-VN",
        }
    }

    /// Voice name understood by espeak-style programs.
    pub fn voice(self) -> &'static str {
        match self {
            Lang::English => "en-us",
            Lang::Vietnamese => "vi",
        }
    }
}

/// Fire-and-forget pronunciation. Implementations never fail or block a quiz step.
pub trait Speaker {
    fn speak(&mut self, text: &str, lang: Lang);
}

/// Speaks nothing; keeps a trace of what would have been said.
#[derive(Debug, Default)]
pub struct Silent;

impl Speaker for Silent {
    fn speak(&mut self, text: &str, lang: Lang) {
        tracing::debug!(lang = lang.tag(), "speak: {}", text);
    }
}

/// Hands text to an external TTS program such as `espeak-ng -v en-us <text>`.
#[derive(Debug)]
pub struct CommandSpeaker {
    program: String,
    pending: Option<Child>,
}

impl CommandSpeaker {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            pending: None,
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(mut child) = self.pending.take() {
            if let Ok(None) = child.try_wait() {
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&mut self, text: &str, lang: Lang) {
        self.cancel_pending();

        let spawned = Command::new(&self.program)
            .arg("-v")
            .arg(lang.voice())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(child) => self.pending = Some(child),
            Err(err) => tracing::warn!(program = %self.program, "speech unavailable: {}", err),
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
