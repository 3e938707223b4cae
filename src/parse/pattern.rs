//! Line pattern matchers for the battle log's reporting phrasings
//!
//! Each matcher is a pure function returning `Some` capture when the
//! line fits its phrasing. Matchers never consult state; the scanners
//! decide priority and whose unit a capture belongs to.

/// Split off the leading run of ASCII digits, requiring at least one
fn leading_digits(text: &str) -> Option<(&str, &str)> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if end == 0 {
        None
    } else {
        Some(text.split_at(end))
    }
}

/// Six slash-delimited integers, e.g. "4/0/12/0/1/2"
fn parse_six(text: &str) -> Option<[u32; 6]> {
    let mut values = [0u32; 6];
    let mut parts = text.split('/');
    for slot in &mut values {
        *slot = parts.next()?.trim().parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(values)
}

fn is_word(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split off a four-digit hex location prefix. Checking the bytes before
/// splitting keeps multibyte text from tripping a char-boundary panic.
fn split_location(text: &str) -> Option<(&str, &str)> {
    let prefix = text.as_bytes().get(..4)?;
    if !prefix.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(text.split_at(4))
}

/// `Impulse T.I:` - returns the raw time text; conversion (and its
/// failure reporting) is the caller's job
pub fn impulse_header(line: &str) -> Option<&str> {
    let time = line.strip_prefix("Impulse ")?.strip_suffix(':')?;
    let (turns, imps) = time.split_once('.')?;
    let numeric = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if numeric(turns) && numeric(imps) {
        Some(time)
    } else {
        None
    }
}

/// Captures from a unit-creation line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLine<'a> {
    pub name: &'a str,
    pub unit_type: &'a str,
    pub location: &'a str,
    pub direction: Option<&'a str>,
    pub speed: Option<u32>,
}

/// `NAME (Type:TYPE) has been added at LLLL[, direction D, speed S]`
pub fn add_line(line: &str) -> Option<AddLine<'_>> {
    let (name, rest) = line.split_once(" (Type:")?;
    let (unit_type, rest) = rest.split_once(") has been added at ")?;
    if name.is_empty() {
        return None;
    }
    let (location, tail) = split_location(rest)?;
    let mut direction = None;
    let mut speed = None;
    if let Some(tail) = tail.strip_prefix(", direction ") {
        let (dir, tail) = tail.split_once(", speed ")?;
        let (digits, _) = leading_digits(tail)?;
        direction = Some(dir);
        speed = Some(digits.parse().ok()?);
    }
    Some(AddLine {
        name,
        unit_type,
        location,
        direction,
        speed,
    })
}

/// `PLAYER has selected TYPE` - returns (player, unit type)
pub fn player_select(line: &str) -> Option<(&str, &str)> {
    let (player, unit_type) = line.split_once(" has selected ")?;
    if player.is_empty() {
        return None;
    }
    Some((player, unit_type))
}

/// The cloaking-device activity order header. The announcing player is
/// on the following line.
pub fn cloak_trigger(line: &str) -> bool {
    line.starts_with("Activity Orders (Segment: 6B02.01, Activate/deactivate cloaking device.)")
}

/// `WHO orders are ...` - the announcer under a cloak trigger
pub fn cloak_announcer(line: &str) -> Option<&str> {
    let (who, _) = line.split_once(" orders are")?;
    if who.is_empty() {
        return None;
    }
    Some(who)
}

/// `Allocation of damage for: NAME` - the two lines after carry the
/// allocation and reinforcement breakdowns
pub fn damage_header(line: &str) -> Option<&str> {
    line.strip_prefix("Allocation of damage for: ")
}

/// Captures from a damage allocation line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageLine {
    pub arcs: [u32; 6],
    pub total: u32,
}

/// `Damage: a/b/c/d/e/f (Total: N)`
pub fn damage_allocation(line: &str) -> Option<DamageLine> {
    let rest = line.strip_prefix("Damage: ")?;
    let (arcs_text, total_text) = rest.split_once(" (Total: ")?;
    let total = total_text.strip_suffix(')')?.trim().parse().ok()?;
    let arcs = parse_six(arcs_text)?;
    Some(DamageLine { arcs, total })
}

/// `Shield Reinforcement: a/b/c/d/e/f`
pub fn shield_reinforcement(line: &str) -> Option<[u32; 6]> {
    parse_six(line.strip_prefix("Shield Reinforcement: ")?)
}

/// `Total # of Internals = N`
pub fn internals(line: &str) -> Option<u32> {
    line.strip_prefix("Total # of Internals = ")?
        .trim()
        .parse()
        .ok()
}

/// Captures from a facing-change line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacingLine<'a> {
    pub name: &'a str,
    pub facing: &'a str,
    pub moves: &'a str,
}

/// `NAME has changed to facing F after N move(s)`
pub fn facing_change(line: &str) -> Option<FacingLine<'_>> {
    let (name, rest) = line.split_once(" has changed to facing ")?;
    let (facing, moves) = rest.split_once(" after ")?;
    let moves = moves.strip_suffix(" move(s)")?;
    if name.is_empty() || !is_word(facing) || moves.is_empty() {
        return None;
    }
    Some(FacingLine {
        name,
        facing,
        moves,
    })
}

/// How a unit reached a new hex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveVerb {
    Moved,
    SideSlipped,
    Turned,
}

/// Captures from a location-change line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationLine<'a> {
    pub name: &'a str,
    pub verb: MoveVerb,
    pub location: &'a str,
    pub facing: &'a str,
}

/// `NAME has (moved|side-slipped|turned) to LLLLF`
pub fn location_change(line: &str) -> Option<LocationLine<'_>> {
    const VERBS: [(&str, MoveVerb); 3] = [
        (" has moved to ", MoveVerb::Moved),
        (" has side-slipped to ", MoveVerb::SideSlipped),
        (" has turned to ", MoveVerb::Turned),
    ];
    for (marker, verb) in VERBS {
        let Some((name, rest)) = line.split_once(marker) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        let Some((location, facing)) = split_location(rest) else {
            continue;
        };
        if is_word(facing) {
            return Some(LocationLine {
                name,
                verb,
                location,
                facing,
            });
        }
    }
    None
}

/// `NAME has been removed` / `NAME has been discarded`
pub fn remove_line(line: &str) -> Option<&str> {
    line.strip_suffix(" has been removed")
        .or_else(|| line.strip_suffix(" has been discarded"))
        .filter(|name| !name.is_empty())
}

/// Captures from a speed-change line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedLine<'a> {
    pub name: &'a str,
    pub speed: u32,
}

/// `NAME (changed|initial) speed to N`
pub fn speed_change(line: &str) -> Option<SpeedLine<'_>> {
    for marker in [" changed speed to ", " initial speed to "] {
        let Some((name, value)) = line.split_once(marker) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if let Ok(speed) = value.trim().parse() {
            return Some(SpeedLine { name, speed });
        }
    }
    None
}

/// `NAME drops tractor on TARGET` - returns (name, target)
pub fn tractor_down(line: &str) -> Option<(&str, &str)> {
    line.split_once(" drops tractor on ")
        .filter(|(name, target)| !name.is_empty() && !target.is_empty())
}

/// `NAME tractors TARGET` - returns (name, target)
pub fn tractor_up(line: &str) -> Option<(&str, &str)> {
    line.split_once(" tractors ")
        .filter(|(name, target)| !name.is_empty() && !target.is_empty())
}

/// Captures from a weapon-fire line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FireLine<'a> {
    pub name: &'a str,
    pub weapon: &'a str,
    pub id: &'a str,
    pub arc: &'a str,
    pub target: &'a str,
    /// Firing mode, when the log reports one ("using ...")
    pub mode: Option<&'a str>,
    pub range: u32,
}

/// `NAME fires WEAPON #ID (ARC) at TARGET [using MODE ](Range: N)`
pub fn weapon_fire(line: &str) -> Option<FireLine<'_>> {
    let (name, rest) = line.split_once(" fires ")?;
    let (weapon, rest) = rest.split_once(" #")?;
    let (id, rest) = rest.split_once(" (")?;
    let (arc, rest) = rest.split_once(") at ")?;
    let (target_text, range_text) = rest.rsplit_once("(Range: ")?;
    let range = range_text.strip_suffix(')')?.trim().parse().ok()?;
    let target_text = target_text.strip_suffix(' ')?;
    if name.is_empty() || weapon.is_empty() || !is_word(id) || arc.is_empty() {
        return None;
    }
    let (target, mode) = match target_text.split_once(" using ") {
        Some((target, mode)) => (target, Some(mode)),
        None => (target_text, None),
    };
    if target.is_empty() {
        return None;
    }
    Some(FireLine {
        name,
        weapon,
        id,
        arc,
        target,
        mode,
        range,
    })
}
