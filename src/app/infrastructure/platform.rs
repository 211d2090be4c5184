/// Source of the "prefers dark color scheme" signal.
pub trait SystemPreference {
    fn prefers_dark(&self) -> bool;
}

/// Reads the desktop's color-scheme setting.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsPreference;

impl SystemPreference for OsPreference {
    fn prefers_dark(&self) -> bool {
        detect_system_dark_mode()
    }
}

/// Fixed answer, for tests and for `--prefers-dark` style overrides.
#[derive(Debug, Clone, Copy)]
pub struct FixedPreference(pub bool);

impl SystemPreference for FixedPreference {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

pub fn detect_system_dark_mode() -> bool {
    #[cfg(target_os = "windows")]
    {
        use winreg::RegKey;
        use winreg::enums::HKEY_CURRENT_USER;

        // AppsUseLightTheme: 0 = dark
        let personalize = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize");
        if let Ok(key) = personalize {
            if let Ok(value) = key.get_value::<u32, _>("AppsUseLightTheme") {
                return value == 0;
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        if command_output("gsettings", &["get", "org.gnome.desktop.interface", "color-scheme"])
            .is_some_and(|scheme| scheme.contains("prefer-dark"))
        {
            return true;
        }
        if command_output("gsettings", &["get", "org.gnome.desktop.interface", "gtk-theme"])
            .is_some_and(|theme| theme.to_lowercase().contains("dark"))
        {
            return true;
        }
    }

    #[cfg(target_os = "macos")]
    {
        if command_output("defaults", &["read", "-g", "AppleInterfaceStyle"])
            .is_some_and(|style| style.to_lowercase().contains("dark"))
        {
            return true;
        }
    }

    false
}

#[cfg(any(target_os = "linux", target_os = "macos"))]
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}
