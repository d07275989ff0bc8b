use msgs::position::Position;

/// Presentation hooks driven by the receiver-side handlers. Every method
/// has an empty default so a headless participant can implement nothing.
pub trait Presenter {
    fn show_scores(&mut self, _blue: u32, _red: u32) {}

    /// `Some` while the match is over and the winner is known, `None`
    /// otherwise.
    fn show_banner(&mut self, _banner: Option<&str>) {}

    fn play_score_sound(&mut self) {}

    fn place_ball(&mut self, _position: Position) {}
}

impl Presenter for () {}
