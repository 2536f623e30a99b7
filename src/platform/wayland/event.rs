// src/platform/wayland/event.rs

//! `Dispatch` implementations translating Wayland protocol events into
//! `WindowEvent`s on the backend state.

use log::{debug, info, trace};
use std::os::fd::AsRawFd;

use wayland_client::{
    protocol::{wl_compositor, wl_keyboard, wl_region, wl_registry, wl_seat, wl_surface},
    Connection, Dispatch, QueueHandle, WEnum,
};
use wayland_protocols::xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base};
use xkbcommon::xkb;

use super::state::WaylandState;
use crate::keys::{KeySymbol, Modifiers};
use crate::platform::WindowEvent;

impl Dispatch<wl_registry::WlRegistry, ()> for WaylandState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        {
            trace!(
                "Wayland global: name={}, interface={}, version={}",
                name,
                interface,
                version
            );
            match interface.as_str() {
                "wl_compositor" => {
                    let compositor =
                        registry.bind::<wl_compositor::WlCompositor, _, _>(name, 1.min(version), qh, ());
                    state.compositor = Some(compositor);
                }
                "xdg_wm_base" => {
                    let wm_base =
                        registry.bind::<xdg_wm_base::XdgWmBase, _, _>(name, 1.min(version), qh, ());
                    state.wm_base = Some(wm_base);
                }
                "wl_seat" => {
                    let seat = registry.bind::<wl_seat::WlSeat, _, _>(name, 1.min(version), qh, ());
                    state.seat = Some(seat);
                }
                _ => {}
            }
        }
    }
}

impl Dispatch<wl_compositor::WlCompositor, ()> for WaylandState {
    fn event(
        _: &mut Self,
        _: &wl_compositor::WlCompositor,
        _: wl_compositor::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_surface::WlSurface, ()> for WaylandState {
    fn event(
        _: &mut Self,
        _: &wl_surface::WlSurface,
        _: wl_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<wl_region::WlRegion, ()> for WaylandState {
    fn event(
        _: &mut Self,
        _: &wl_region::WlRegion,
        _: wl_region::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<xdg_wm_base::XdgWmBase, ()> for WaylandState {
    fn event(
        _: &mut Self,
        wm_base: &xdg_wm_base::XdgWmBase,
        event: xdg_wm_base::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            wm_base.pong(serial);
            trace!("xdg_wm_base ping {} answered", serial);
        }
    }
}

impl Dispatch<xdg_surface::XdgSurface, ()> for WaylandState {
    fn event(
        state: &mut Self,
        xdg_surface: &xdg_surface::XdgSurface,
        event: xdg_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            xdg_surface.ack_configure(serial);
            if !state.configured {
                state.configured = true;
                info!("Surface configured by the compositor.");
            }
        }
    }
}

impl Dispatch<xdg_toplevel::XdgToplevel, ()> for WaylandState {
    fn event(
        state: &mut Self,
        _: &xdg_toplevel::XdgToplevel,
        event: xdg_toplevel::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            xdg_toplevel::Event::Configure { width, height, .. } => {
                state.apply_configure(width, height);
            }
            xdg_toplevel::Event::Close => {
                state.push_event(WindowEvent::CloseRequested);
            }
            _ => {}
        }
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for WaylandState {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_seat::Event::Capabilities { capabilities } = event {
            if let WEnum::Value(caps) = capabilities {
                if caps.contains(wl_seat::Capability::Keyboard) && state.keyboard.is_none() {
                    debug!("Seat offers a keyboard; acquiring it.");
                    state.keyboard = Some(seat.get_keyboard(qh, ()));
                }
            }
        }
    }
}

impl Dispatch<wl_keyboard::WlKeyboard, ()> for WaylandState {
    fn event(
        state: &mut Self,
        _: &wl_keyboard::WlKeyboard,
        event: wl_keyboard::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wl_keyboard::Event::Keymap { format, fd, size } => {
                if format == WEnum::Value(wl_keyboard::KeymapFormat::XkbV1) {
                    // The compositor hands the keymap over as an mmap-able fd.
                    unsafe {
                        let ptr = libc::mmap(
                            std::ptr::null_mut(),
                            size as usize,
                            libc::PROT_READ,
                            libc::MAP_PRIVATE,
                            fd.as_raw_fd(),
                            0,
                        );
                        if ptr != libc::MAP_FAILED {
                            let bytes = std::slice::from_raw_parts(ptr as *const u8, size as usize);
                            if let Ok(text) = std::str::from_utf8(bytes) {
                                let text = text.trim_end_matches('\0');
                                if let Some(keymap) = xkb::Keymap::new_from_string(
                                    &state.xkb_context,
                                    text.to_string(),
                                    xkb::KEYMAP_FORMAT_TEXT_V1,
                                    xkb::KEYMAP_COMPILE_NO_FLAGS,
                                ) {
                                    state.xkb_state = Some(xkb::State::new(&keymap));
                                    debug!("Keyboard keymap compiled.");
                                }
                            }
                            libc::munmap(ptr, size as usize);
                        }
                    }
                }
            }
            wl_keyboard::Event::Enter { .. } => {
                trace!("Keyboard focus entered the surface.");
            }
            wl_keyboard::Event::Leave { .. } => {
                trace!("Keyboard focus left the surface.");
            }
            wl_keyboard::Event::Modifiers {
                mods_depressed,
                mods_latched,
                mods_locked,
                group,
                ..
            } => {
                if let Some(xkb_state) = &mut state.xkb_state {
                    xkb_state.update_mask(mods_depressed, mods_latched, mods_locked, 0, 0, group);

                    let mut mods = Modifiers::empty();
                    if xkb_state.mod_name_is_active(xkb::MOD_NAME_SHIFT, xkb::STATE_MODS_EFFECTIVE) {
                        mods.insert(Modifiers::SHIFT);
                    }
                    if xkb_state.mod_name_is_active(xkb::MOD_NAME_CTRL, xkb::STATE_MODS_EFFECTIVE) {
                        mods.insert(Modifiers::CONTROL);
                    }
                    if xkb_state.mod_name_is_active(xkb::MOD_NAME_ALT, xkb::STATE_MODS_EFFECTIVE) {
                        mods.insert(Modifiers::ALT);
                    }
                    if xkb_state.mod_name_is_active(xkb::MOD_NAME_LOGO, xkb::STATE_MODS_EFFECTIVE) {
                        mods.insert(Modifiers::SUPER);
                    }
                    state.modifiers = mods;
                }
            }
            wl_keyboard::Event::Key {
                key, state: kstate, ..
            } => {
                if kstate != WEnum::Value(wl_keyboard::KeyState::Pressed) {
                    return;
                }
                let symbol = state.xkb_state.as_mut().map(|xkb_state| {
                    // evdev scancodes are offset by 8 in xkb keycodes.
                    let keycode = key + 8;
                    let keysym = xkb_state.key_get_one_sym(keycode.into());
                    let text = xkb_state.key_get_utf8(keycode.into());
                    keysym_to_symbol(keysym, &text)
                });
                if let Some(symbol) = symbol {
                    let modifiers = state.modifiers;
                    state.push_event(WindowEvent::Key { symbol, modifiers });
                }
            }
            _ => {}
        }
    }
}

/// Maps an xkb keysym (plus its translated text) to a `KeySymbol`.
fn keysym_to_symbol(keysym: xkb::Keysym, text: &str) -> KeySymbol {
    use xkbcommon::xkb::keysyms::*;
    match u32::from(keysym) {
        KEY_Return => KeySymbol::Enter,
        KEY_BackSpace => KeySymbol::Backspace,
        KEY_Tab => KeySymbol::Tab,
        KEY_Escape => KeySymbol::Escape,
        KEY_Home => KeySymbol::Home,
        KEY_Left => KeySymbol::Left,
        KEY_Up => KeySymbol::Up,
        KEY_Right => KeySymbol::Right,
        KEY_Down => KeySymbol::Down,
        KEY_Page_Up => KeySymbol::PageUp,
        KEY_Page_Down => KeySymbol::PageDown,
        KEY_End => KeySymbol::End,
        KEY_Insert => KeySymbol::Insert,
        KEY_Delete => KeySymbol::Delete,
        KEY_Shift_L | KEY_Shift_R => KeySymbol::Shift,
        KEY_Control_L | KEY_Control_R => KeySymbol::Control,
        KEY_Alt_L | KEY_Alt_R => KeySymbol::Alt,
        KEY_Super_L | KEY_Super_R => KeySymbol::Super,
        _ => match text.chars().next() {
            Some(c) if !c.is_control() => KeySymbol::Char(c),
            _ => KeySymbol::Unknown,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xkbcommon::xkb::keysyms::*;

    #[test_log::test]
    fn named_keys_translate_to_named_symbols() {
        assert_eq!(
            keysym_to_symbol(xkb::Keysym::from(KEY_Escape), "\u{1b}"),
            KeySymbol::Escape
        );
        assert_eq!(
            keysym_to_symbol(xkb::Keysym::from(KEY_Return), "\r"),
            KeySymbol::Enter
        );
    }

    #[test_log::test]
    fn character_keys_carry_their_character() {
        assert_eq!(
            keysym_to_symbol(xkb::Keysym::from(KEY_q), "q"),
            KeySymbol::Char('q')
        );
        assert_eq!(
            keysym_to_symbol(xkb::Keysym::from(KEY_Q), "Q"),
            KeySymbol::Char('Q')
        );
    }

    #[test_log::test]
    fn keys_with_no_translation_are_unknown() {
        assert_eq!(
            keysym_to_symbol(xkb::Keysym::from(KEY_VoidSymbol), ""),
            KeySymbol::Unknown
        );
    }
}
