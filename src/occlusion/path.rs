use std::fmt;

/// A branch of the occlusion decision procedure.
///
/// Every evaluation ends in exactly one *outcome* branch (see
/// [Path::is_outcome]). The others record intermediate steps of the split
/// evaluation, when the body crosses both the horizon and the plane.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Path {
    InsideHorizon,
    AbovePlane,
    BelowPlane,
    CapBisected,
    CapMajor,
    CapMinor,
    LensOnly,
    LensAbovePlane,
    LensBelowPlane,
    LensBisected,
    LensMinor,
    LensMajor,
    SplitCapBisected,
    SplitCapMajor,
    SplitCapMinor,
    CapOnly,
    CapAndLens,
}

impl Path {
    pub const COUNT: usize = 17;

    pub const ALL: [Path; Path::COUNT] = [
        Path::InsideHorizon,
        Path::AbovePlane,
        Path::BelowPlane,
        Path::CapBisected,
        Path::CapMajor,
        Path::CapMinor,
        Path::LensOnly,
        Path::LensAbovePlane,
        Path::LensBelowPlane,
        Path::LensBisected,
        Path::LensMinor,
        Path::LensMajor,
        Path::SplitCapBisected,
        Path::SplitCapMajor,
        Path::SplitCapMinor,
        Path::CapOnly,
        Path::CapAndLens,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_outcome(self) -> bool {
        matches!(
            self,
            Path::InsideHorizon
                | Path::AbovePlane
                | Path::BelowPlane
                | Path::CapBisected
                | Path::CapMajor
                | Path::CapMinor
                | Path::LensOnly
                | Path::CapOnly
                | Path::CapAndLens
        )
    }

    // (inc) keeps everything it looked at, (exc) drops it, (part) keeps some
    pub fn label(self) -> &'static str {
        match self {
            Path::InsideHorizon => "Inside horizon (inc)",
            Path::AbovePlane => "Above plane (inc)",
            Path::BelowPlane => "Below plane (exc)",
            Path::CapBisected => "Half above plane (part)",
            Path::CapMajor => "Mostly above plane (part)",
            Path::CapMinor => "Mostly below plane (part)",
            Path::LensOnly => "Lens only, body below (part)",
            Path::LensAbovePlane => "Lens above plane (exc)",
            Path::LensBelowPlane => "Lens below plane (inc)",
            Path::LensBisected => "Half lens below plane (part)",
            Path::LensMinor => "Lens mostly above plane (part)",
            Path::LensMajor => "Lens mostly below plane (part)",
            Path::SplitCapBisected => "Plus half cap (part)",
            Path::SplitCapMajor => "Plus major cap (part)",
            Path::SplitCapMinor => "Plus minor cap (part)",
            Path::CapOnly => "Cap only (inc)",
            Path::CapAndLens => "Cap and lens (inc)",
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// How often each branch was taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathTally {
    counts: [u64; Path::COUNT],
}

impl PathTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, trace: &[Path]) {
        for path in trace {
            self.counts[path.index()] += 1;
        }
    }

    pub fn count(&self, path: Path) -> u64 {
        self.counts[path.index()]
    }

    pub fn counts(&self) -> &[u64; Path::COUNT] {
        &self.counts
    }

    /// Number of completed evaluations.
    pub fn outcomes(&self) -> u64 {
        Path::ALL
            .iter()
            .filter(|path| path.is_outcome())
            .map(|path| self.count(*path))
            .sum()
    }
}

impl fmt::Display for PathTally {
    // Four to a row
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in Path::ALL.iter().enumerate() {
            write!(f, "{:>2} {:>32}:{:>7} ", path.index(), path.label(), self.count(*path))?;
            if (i + 1) % 4 == 0 || i + 1 == Path::COUNT {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Formats a trace the way the debug log and samples show it, e.g. "7,13,15".
pub fn format_trace(trace: &[Path]) -> String {
    trace
        .iter()
        .map(|path| path.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
