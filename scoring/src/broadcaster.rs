use msgs::score_msg::ScoreBroadcast;

/// Outbound side of the host: hands every score event to whatever
/// transport reaches the participants. Delivery is fire-and-forget.
pub trait Broadcaster {
    fn broadcast(&mut self, msg: ScoreBroadcast);
}

/// Replicas never publish.
impl Broadcaster for () {
    fn broadcast(&mut self, _msg: ScoreBroadcast) {}
}

/// Keeps everything it is handed, in order.
impl Broadcaster for Vec<ScoreBroadcast> {
    fn broadcast(&mut self, msg: ScoreBroadcast) {
        self.push(msg);
    }
}
