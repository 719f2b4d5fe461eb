/// Which credential field key presses currently edit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    None,
    Url,
    User,
    Password,
}

impl InputMode {
    fn next(self) -> Self {
        match self {
            InputMode::Url => InputMode::User,
            InputMode::User => InputMode::Password,
            InputMode::Password | InputMode::None => InputMode::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InputMode::None => "",
            InputMode::Url => "Server URL:",
            InputMode::User => "Username:",
            InputMode::Password => "Password:",
        }
    }
}

/// Server credentials as typed on the settings screen. Only kept in memory,
/// the password is never written to disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Default)]
pub struct Settings {
    mode: InputMode,
    pub credentials: Credentials,
}

impl Settings {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            mode: InputMode::None,
            credentials,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode != InputMode::None
    }

    /// Starts editing at the URL field.
    pub fn begin(&mut self) {
        self.mode = InputMode::Url;
    }

    pub fn field(&self) -> Option<&str> {
        match self.mode {
            InputMode::None => None,
            InputMode::Url => Some(&self.credentials.url),
            InputMode::User => Some(&self.credentials.user),
            InputMode::Password => Some(&self.credentials.password),
        }
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.mode {
            InputMode::None => None,
            InputMode::Url => Some(&mut self.credentials.url),
            InputMode::User => Some(&mut self.credentials.user),
            InputMode::Password => Some(&mut self.credentials.password),
        }
    }

    pub fn enter_str(&mut self, text: &str) {
        if let Some(field) = self.field_mut() {
            field.push_str(text);
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(field) = self.field_mut() {
            field.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(field) = self.field_mut() {
            field.pop();
        }
    }

    /// Moves on to the next field. Returns `true` once the last field was
    /// confirmed and editing ended.
    pub fn advance(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.mode = self.mode.next();
        !self.is_editing()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_deleting() {
        let mut settings = Settings::default();
        settings.begin();
        for c in "abc".chars() {
            settings.enter_char(c);
        }
        settings.delete_char();
        assert_eq!(settings.field(), Some("ab"));

        assert!(!settings.advance());
        assert_eq!(settings.mode(), InputMode::User);
        assert_eq!(settings.credentials.url, "ab");
    }

    #[test]
    fn fields_are_visited_in_order() {
        let mut settings = Settings::default();
        settings.begin();
        settings.enter_str("http://host:8096");
        settings.advance();
        settings.enter_str("me");
        settings.advance();
        settings.enter_char('p');
        settings.enter_char('ä');
        assert!(settings.advance());

        assert_eq!(settings.mode(), InputMode::None);
        assert_eq!(
            settings.credentials,
            Credentials {
                url: "http://host:8096".to_string(),
                user: "me".to_string(),
                password: "pä".to_string(),
            }
        );
    }

    #[test]
    fn edits_outside_input_mode_are_ignored() {
        let mut settings = Settings::default();
        settings.enter_char('x');
        settings.delete_char();
        assert!(!settings.advance());
        assert_eq!(settings.credentials, Credentials::default());
    }

    #[test]
    fn deleting_from_empty_field() {
        let mut settings = Settings::default();
        settings.begin();
        settings.delete_char();
        assert_eq!(settings.field(), Some(""));
        assert!(settings.is_editing());
    }
}
