//! Game session state machine: MainMenu -> Playing -> Won -> Quit.
//!
//! There is no lose state. Won is terminal for gameplay: it counts down a
//! fixed display window (8 seconds of simulated time) and then quits, so the
//! win banner stays up without blocking the event loop.

/// How long the win banner is shown, in 30 Hz fixed steps.
pub const WIN_DISPLAY_STEPS: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    MainMenu,
    Playing,
    Won { steps_left: u32 },
    Quit,
}

pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::MainMenu,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_quit(&self) -> bool {
        self.state == SessionState::Quit
    }

    /// MainMenu -> Playing. Ignored from any other state.
    pub fn start(&mut self) {
        if self.state == SessionState::MainMenu {
            log::info!("Starting game");
            self.state = SessionState::Playing;
        }
    }

    /// Playing -> Won. Ignored from any other state, so the transition fires
    /// exactly once, on the step the star is first touched.
    pub fn win(&mut self) {
        if self.state == SessionState::Playing {
            log::info!("Star collected — you win!");
            self.state = SessionState::Won {
                steps_left: WIN_DISPLAY_STEPS,
            };
        }
    }

    /// Any state -> Quit (window close, menu quit button, Escape).
    pub fn request_quit(&mut self) {
        if self.state != SessionState::Quit {
            log::info!("Quitting");
            self.state = SessionState::Quit;
        }
    }

    /// Advance the Won countdown by one fixed step; Quit when it runs out.
    pub fn tick_won(&mut self) {
        if let SessionState::Won { steps_left } = self.state {
            if steps_left <= 1 {
                self.state = SessionState::Quit;
            } else {
                self.state = SessionState::Won {
                    steps_left: steps_left - 1,
                };
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
