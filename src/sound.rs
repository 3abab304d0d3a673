//! Short oscillator beeps played through the webview's Web Audio API.

use serde::{Deserialize, Serialize};

pub const CUE_SECONDS: f64 = 0.5;
pub const START_GAIN: f64 = 0.1;
pub const END_GAIN: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Message,
    Success,
    Error,
}

impl SoundCue {
    pub fn frequency_hz(self) -> u32 {
        match self {
            SoundCue::Message => 800,
            SoundCue::Success => 1200,
            SoundCue::Error => 400,
        }
    }

    /// Script handed to the renderer's `eval`. Failures to create an audio
    /// context (autoplay policy, no audio device) are swallowed.
    pub fn script(self) -> String {
        format!(
            r#"(function() {{
    try {{
        const Ctx = window.AudioContext || window.webkitAudioContext;
        if (!Ctx) return;
        const context = new Ctx();
        const oscillator = context.createOscillator();
        const gain = context.createGain();
        oscillator.connect(gain);
        gain.connect(context.destination);
        oscillator.frequency.setValueAtTime({freq}, context.currentTime);
        gain.gain.setValueAtTime({start}, context.currentTime);
        gain.gain.exponentialRampToValueAtTime({end}, context.currentTime + {secs});
        oscillator.start();
        oscillator.stop(context.currentTime + {secs});
    }} catch (e) {{
        console.debug('[Pahiy] sound cue skipped:', e);
    }}
}})();"#,
            freq = self.frequency_hz(),
            start = START_GAIN,
            end = END_GAIN,
            secs = CUE_SECONDS,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cue_frequencies() {
        assert_eq!(SoundCue::Message.frequency_hz(), 800);
        assert_eq!(SoundCue::Success.frequency_hz(), 1200);
        assert_eq!(SoundCue::Error.frequency_hz(), 400);
    }

    #[test]
    fn script_carries_tone_parameters() {
        let script = SoundCue::Error.script();
        assert!(script.contains("setValueAtTime(400"));
        assert!(script.contains("setValueAtTime(0.1"));
        assert!(script.contains("exponentialRampToValueAtTime(0.01"));
        assert!(script.contains("context.currentTime + 0.5"));
    }
}
