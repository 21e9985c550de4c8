//! Global hotkey: F8 types the current best word.

use anyhow::Result;
use tracing::info;

use super::commands::Dispatcher;
#[cfg(windows)]
use super::commands::Command;

/// Hotkey ID used with RegisterHotKey.
#[cfg(windows)]
const HOTKEY_TYPE_BEST: i32 = 1;

/// Registers F8 on a dedicated message-loop thread.
///
/// The thread lives until the process exits.
#[cfg(windows)]
pub fn spawn_hotkey_listener(dispatcher: Dispatcher) -> Result<()> {
    use std::sync::mpsc::channel;
    use tracing::warn;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, MOD_NOREPEAT, VK_F8,
    };
    use windows::Win32::UI::WindowsAndMessaging::{GetMessageW, MSG, WM_HOTKEY};

    let (ready_tx, ready_rx) = channel();

    std::thread::spawn(move || {
        // Thread-level registration: WM_HOTKEY lands in this thread's queue
        let registered = unsafe {
            RegisterHotKey(HWND::default(), HOTKEY_TYPE_BEST, MOD_NOREPEAT, VK_F8.0 as u32)
        };
        let failed = registered.is_err();
        let _ = ready_tx.send(registered.map_err(anyhow::Error::from));
        if failed {
            return;
        }

        let mut msg = MSG::default();
        unsafe {
            while GetMessageW(&mut msg, HWND::default(), 0, 0).as_bool() {
                if msg.message == WM_HOTKEY && msg.wParam.0 as i32 == HOTKEY_TYPE_BEST {
                    dispatcher.dispatch(Command::TypeBestWord);
                }
            }
            if let Err(e) = UnregisterHotKey(HWND::default(), HOTKEY_TYPE_BEST) {
                warn!("Failed to unregister hotkey: {}", e);
            }
        }
    });

    ready_rx
        .recv()
        .map_err(|_| anyhow::anyhow!("hotkey thread exited before registering"))??;
    info!("Hotkey: F8 (type best word)");
    Ok(())
}

#[cfg(not(windows))]
pub fn spawn_hotkey_listener(dispatcher: Dispatcher) -> Result<()> {
    drop(dispatcher);
    info!("Global hotkey is not supported on this platform");
    Ok(())
}
