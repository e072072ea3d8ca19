use log::debug;

use crate::geometry::{Point, Segment};


/// Polyline the marker travels along
/// Zero-length segments are left out so progress never stalls on them
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    segments: Vec<Segment>,
    total_length: f64,
    end: Point,
}

impl Track {

    /// None for fewer than two points
    pub fn new(points: &[Point]) -> Option<Self> {
        let (first, last) = (points.first()?, points.last()?);
        if points.len() < 2 {
            return None;
        }

        let segments: Vec<Segment> = points
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
            .filter(|s| s.length > 0.0)
            .collect();
        let total_length = segments.iter().map(|s| s.length).sum();
        let end = segments.last().map(|s| s.end).unwrap_or(*last);

        debug!("track from {first:?}: {} segments, length {total_length}", segments.len());
        Some(Self { segments, total_length, end })
    }

    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn start(&self) -> Point {
        self.segments.first().map(|s| s.start).unwrap_or(self.end)
    }

    pub fn end(&self) -> Point {
        self.end
    }

    /// Position after travelling distance from the start
    /// Scans cumulative segment lengths and interpolates within the segment found
    pub fn position_at(&self, distance: f64) -> Point {
        let mut travelled = 0.0;
        for segment in &self.segments {
            if travelled + segment.length >= distance {
                return segment.point_at(distance - travelled);
            }
            travelled += segment.length;
        }
        self.end
    }
}


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Running,
    /// Idle after reaching the end of the track
    Finished,
}

/// Identifies one run of the animator
/// Ticks scheduled for an earlier run are ignored once a new run starts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunId(u64);

/// Outcome of a tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Frame {
    /// Marker moved, keep scheduling ticks
    Moved(Point),
    /// Marker reached the end of the track, the run is over
    Arrived(Point),
    /// Not running, or the tick belongs to a stale run
    Inactive,
}


/// Moves a marker along a route at constant speed
///
/// Time is supplied by the caller through tick, so the animator never
/// schedules anything itself. At most one run is active at a time.
#[derive(Clone, Debug)]
pub struct PathAnimator {
    speed: f64,
    state: AnimatorState,
    track: Option<Track>,
    elapsed: f64,
    marker: Option<Point>,
    current: Option<RunId>,
    runs: u64,
}

impl PathAnimator {

    /// speed in canvas units per second
    pub fn new(speed: f64) -> Self {
        Self {
            speed,
            state: AnimatorState::Idle,
            track: None,
            elapsed: 0.0,
            marker: None,
            current: None,
            runs: 0,
        }
    }

    /// Start a run along the given points, stopping any run in progress
    /// Fewer than two points, or a speed that is not positive, leaves the animator Idle
    pub fn start(&mut self, points: &[Point]) -> Option<RunId> {
        self.stop();
        if !(self.speed > 0.0 && self.speed.is_finite()) {
            debug!("not animating at speed {}", self.speed);
            return None;
        }

        let track = Track::new(points)?;
        self.runs += 1;
        let run = RunId(self.runs);

        self.marker = Some(track.start());
        self.track = Some(track);
        self.elapsed = 0.0;
        self.state = AnimatorState::Running;
        self.current = Some(run);
        Some(run)
    }

    /// Advance the given run by dt seconds
    pub fn tick(&mut self, run: RunId, dt: f64) -> Frame {
        if self.state != AnimatorState::Running || self.current != Some(run) {
            return Frame::Inactive;
        }
        self.elapsed += dt.max(0.0);
        let distance = self.elapsed * self.speed;

        let Some(track) = &self.track else {
            return Frame::Inactive;
        };

        if distance >= track.total_length() {
            let end = track.end();
            self.release();
            self.state = AnimatorState::Finished;
            return Frame::Arrived(end);
        }

        let position = track.position_at(distance);
        self.marker = Some(position);
        Frame::Moved(position)
    }

    /// Cancel any run and drop the marker, from any state
    pub fn stop(&mut self) {
        self.release();
        self.state = AnimatorState::Idle;
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == AnimatorState::Running
    }

    pub fn current_run(&self) -> Option<RunId> {
        self.current
    }

    pub fn marker(&self) -> Option<Point> {
        self.marker
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn track(&self) -> Option<&Track> {
        self.track.as_ref()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    fn release(&mut self) {
        self.track = None;
        self.marker = None;
        self.current = None;
        self.elapsed = 0.0;
    }
}
