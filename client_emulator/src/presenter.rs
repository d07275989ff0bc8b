use msgs::position::Position;
use scoring::{PlayerView, Presenter};

/// Score board, banner and sound cue rendered as console lines.
pub struct ConsolePresenter {
    view: PlayerView,
    lines: Vec<String>,
}

impl ConsolePresenter {
    pub fn new(view: PlayerView) -> ConsolePresenter {
        ConsolePresenter {
            view,
            lines: Vec::new(),
        }
    }

    /// Prints and clears everything rendered since the last flush.
    pub fn flush(&mut self) {
        for line in self.lines.drain(..) {
            println!("{line}");
        }
    }

    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl Presenter for ConsolePresenter {
    fn show_scores(&mut self, blue: u32, red: u32) {
        self.lines.push(format!("[ Blue {blue} : {red} Red ]"));
    }

    fn show_banner(&mut self, banner: Option<&str>) {
        if let Some(banner) = banner {
            self.lines.push(format!("*** {banner} ***"));
        }
    }

    fn play_score_sound(&mut self) {
        self.lines.push("*goal horn*".to_owned());
    }

    fn place_ball(&mut self, position: Position) {
        self.lines.push(format!("puck back at ({}, {}, {}) on the {}", position.x, position.y, position.z, self.view));
    }
}
