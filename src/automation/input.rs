//! Keyboard input simulation.
//!
//! Words are typed with `SendInput` as Unicode key events, one character at a
//! time, followed by Enter to submit them.

use anyhow::Result;
use std::time::Duration;

/// Types text into whatever window has focus, then confirms it.
pub trait KeystrokeInjector: Send + Sync {
    fn type_text(&self, text: &str) -> Result<()>;
}

/// Hardware-level keyboard simulation.
#[derive(Debug, Clone)]
pub struct SendInputKeyboard {
    key_interval: Duration,
}

impl SendInputKeyboard {
    pub fn new(key_interval: Duration) -> Self {
        Self { key_interval }
    }
}

#[cfg(windows)]
impl KeystrokeInjector for SendInputKeyboard {
    fn type_text(&self, text: &str) -> Result<()> {
        use windows::Win32::UI::Input::KeyboardAndMouse::VK_RETURN;

        for unit in text.encode_utf16() {
            send_key(unicode_event(unit, false))?;
            send_key(unicode_event(unit, true))?;
            std::thread::sleep(self.key_interval);
        }
        send_key(virtual_key_event(VK_RETURN, false))?;
        send_key(virtual_key_event(VK_RETURN, true))?;
        Ok(())
    }
}

#[cfg(not(windows))]
impl KeystrokeInjector for SendInputKeyboard {
    fn type_text(&self, _text: &str) -> Result<()> {
        let _ = self.key_interval;
        Err(anyhow::anyhow!(
            "keystroke injection is not supported on this platform"
        ))
    }
}

#[cfg(windows)]
fn unicode_event(
    unit: u16,
    key_up: bool,
) -> windows::Win32::UI::Input::KeyboardAndMouse::INPUT {
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_KEYUP, KEYEVENTF_UNICODE,
        VIRTUAL_KEY,
    };

    let flags = if key_up {
        KEYEVENTF_UNICODE | KEYEVENTF_KEYUP
    } else {
        KEYEVENTF_UNICODE
    };
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: unit,
                dwFlags: flags,
                ..Default::default()
            },
        },
    }
}

#[cfg(windows)]
fn virtual_key_event(
    key: windows::Win32::UI::Input::KeyboardAndMouse::VIRTUAL_KEY,
    key_up: bool,
) -> windows::Win32::UI::Input::KeyboardAndMouse::INPUT {
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    };

    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: key,
                dwFlags: if key_up {
                    KEYEVENTF_KEYUP
                } else {
                    KEYBD_EVENT_FLAGS(0)
                },
                ..Default::default()
            },
        },
    }
}

#[cfg(windows)]
fn send_key(input: windows::Win32::UI::Input::KeyboardAndMouse::INPUT) -> Result<()> {
    use windows::Win32::UI::Input::KeyboardAndMouse::{SendInput, INPUT};

    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent != 1 {
        return Err(anyhow::anyhow!("SendInput rejected the key event"));
    }
    Ok(())
}
