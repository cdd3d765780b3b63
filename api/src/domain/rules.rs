//! Business rules
//!
//! Field-level checks for employees and teams, and the cross-record rules for
//! work arrangements and team memberships. Every cross-record rule receives the
//! sibling rows it is evaluated against as an explicit argument; callers are
//! responsible for reading those rows in the same transaction as the write.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::domain::entities::{
    MembershipId, NewEmployee, NewTeam, NewTeamMembership, NewWorkArrangement, Team,
    TeamMembership, WorkArrangement, WorkArrangementId, WorkType,
};
use crate::error::DomainError;

/// Longest accepted employee or team name
pub const NAME_MAX_LEN: usize = 100;

/// Longest accepted company badge identifier
pub const EMPLOYEE_ID_MAX_LEN: usize = 30;

/// Upper bound for an hourly rate (five digits, two of them fractional)
pub const HOURLY_RATE_MAX: Decimal = Decimal::from_parts(99999, 0, 0, false, 2);

/// Total digits an hourly rate may carry
const HOURLY_RATE_MAX_DIGITS: u32 = 5;

/// Fractional digits an hourly rate may carry
const HOURLY_RATE_MAX_SCALE: u32 = 2;

/// Cap on the summed percentages of one employee's part-time arrangements
pub const MAX_TOTAL_PERCENTAGE: i32 = 100;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_ ]+$").expect("name pattern is valid"));

static EMPLOYEE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_]+$").expect("employee id pattern is valid"));

/// Whether a write creates a new row or replaces an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode<Id> {
    Create,
    Update(Id),
}

impl<Id: PartialEq> WriteMode<Id> {
    pub fn is_create(&self) -> bool {
        matches!(self, WriteMode::Create)
    }

    /// True when `id` is the row being replaced
    fn targets(&self, id: &Id) -> bool {
        matches!(self, WriteMode::Update(current) if current == id)
    }
}

// ============================================================================
// Field rules
// ============================================================================

/// Names accept letters, digits, spaces and underscores
pub fn validate_name(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::required(field));
    }
    if value.chars().count() > NAME_MAX_LEN {
        return Err(DomainError::invalid_format(
            field,
            format!("Ensure this field has no more than {} characters.", NAME_MAX_LEN),
        ));
    }
    if !NAME_RE.is_match(value) {
        return Err(DomainError::invalid_format(
            field,
            "Only letters, digits, spaces and underscores are allowed.",
        ));
    }
    Ok(())
}

/// Badge identifiers accept letters, digits and underscores (no spaces)
pub fn validate_employee_id(value: &str) -> Result<(), DomainError> {
    const FIELD: &str = "employee_id";

    if value.is_empty() {
        return Err(DomainError::required(FIELD));
    }
    if value.chars().count() > EMPLOYEE_ID_MAX_LEN {
        return Err(DomainError::invalid_format(
            FIELD,
            format!(
                "Ensure this field has no more than {} characters.",
                EMPLOYEE_ID_MAX_LEN
            ),
        ));
    }
    if !EMPLOYEE_ID_RE.is_match(value) {
        return Err(DomainError::invalid_format(
            FIELD,
            "Only letters, digits and underscores are allowed.",
        ));
    }
    Ok(())
}

/// Parse a textual hourly rate into a two-place decimal
pub fn parse_hourly_rate(raw: &str) -> Result<Decimal, DomainError> {
    let rate = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_| DomainError::invalid_format("hourly_rate", "A valid number is required."))?;
    validate_hourly_rate(rate)?;

    let mut rate = rate;
    rate.rescale(HOURLY_RATE_MAX_SCALE);
    Ok(rate)
}

/// At most five digits in total, two of them after the decimal point
pub fn validate_hourly_rate(rate: Decimal) -> Result<(), DomainError> {
    const FIELD: &str = "hourly_rate";

    if rate.is_sign_negative() && !rate.is_zero() {
        return Err(DomainError::invalid_format(
            FIELD,
            "Ensure this value is greater than or equal to 0.",
        ));
    }
    if rate.normalize().scale() > HOURLY_RATE_MAX_SCALE {
        return Err(DomainError::invalid_format(
            FIELD,
            format!(
                "Ensure that there are no more than {} decimal places.",
                HOURLY_RATE_MAX_SCALE
            ),
        ));
    }
    if rate > HOURLY_RATE_MAX {
        return Err(DomainError::invalid_format(
            FIELD,
            format!(
                "Ensure that there are no more than {} digits in total.",
                HOURLY_RATE_MAX_DIGITS
            ),
        ));
    }
    Ok(())
}

/// Percentages are whole numbers between 0 and 100
pub fn validate_percentage(value: Option<i64>) -> Result<Option<i16>, DomainError> {
    match value {
        None => Ok(None),
        Some(p) if (0..=MAX_TOTAL_PERCENTAGE as i64).contains(&p) => Ok(Some(p as i16)),
        Some(_) => Err(DomainError::invalid_format(
            "percentage",
            format!(
                "Ensure this value is between 0 and {}.",
                MAX_TOTAL_PERCENTAGE
            ),
        )),
    }
}

pub fn validate_employee(employee: &NewEmployee) -> Result<(), DomainError> {
    validate_name("name", &employee.name)?;
    validate_employee_id(&employee.employee_id)?;
    validate_hourly_rate(employee.hourly_rate)
}

pub fn validate_team(team: &NewTeam) -> Result<(), DomainError> {
    validate_name("name", &team.name)
}

// ============================================================================
// Work arrangement rules
// ============================================================================

/// Check a proposed work arrangement against the employee's stored arrangements.
///
/// `stored` may include the row being updated; it is skipped. Rules apply in
/// order: part-time needs a percentage, full-time may not join any existing
/// arrangement, part-time may not join a full-time one, and part-time
/// percentages may not sum above 100. The two coexistence rules apply to
/// creations only.
pub fn check_work_arrangement(
    proposed: &NewWorkArrangement,
    stored: &[WorkArrangement],
    mode: WriteMode<WorkArrangementId>,
) -> Result<(), DomainError> {
    let others: Vec<&WorkArrangement> = stored
        .iter()
        .filter(|a| a.employee_id == proposed.employee_id && !mode.targets(&a.id))
        .collect();

    match proposed.work_type {
        WorkType::PartTime if proposed.percentage.is_none() => {
            return Err(DomainError::Required {
                field: "percentage",
                message: "Percentage is required for part-time arrangements.".to_string(),
            });
        }
        WorkType::FullTime if mode.is_create() && !others.is_empty() => {
            return Err(DomainError::Conflict(
                "This employee already has another work assignment.".to_string(),
            ));
        }
        WorkType::PartTime if mode.is_create() && others.iter().any(|a| a.is_full_time()) => {
            return Err(DomainError::Conflict(
                "This employee already has a full-time assignment.".to_string(),
            ));
        }
        _ => {}
    }

    if let (WorkType::PartTime, Some(percentage)) = (proposed.work_type, proposed.percentage) {
        let existing: i32 = others
            .iter()
            .filter(|a| a.is_part_time())
            .filter_map(|a| a.percentage)
            .map(i32::from)
            .sum();

        if existing + i32::from(percentage) > MAX_TOTAL_PERCENTAGE {
            return Err(DomainError::Conflict(format!(
                "Sum of percentages exceeds {} ({} already assigned).",
                MAX_TOTAL_PERCENTAGE, existing
            )));
        }
    }

    Ok(())
}

// ============================================================================
// Membership rules
// ============================================================================

/// A given employee may appear in a team only once
pub fn check_membership_unique(
    proposed: &NewTeamMembership,
    stored: &[TeamMembership],
    mode: WriteMode<MembershipId>,
) -> Result<(), DomainError> {
    let duplicate = stored
        .iter()
        .any(|m| !mode.targets(&m.id) && m.links(&proposed.team_id, &proposed.employee_id));

    if duplicate {
        return Err(DomainError::Conflict(
            "This employee is already a member of this team.".to_string(),
        ));
    }
    Ok(())
}

/// A team's leader cannot be removed from it while the team exists
pub fn check_membership_removal(
    membership: &TeamMembership,
    team: Option<&Team>,
) -> Result<(), DomainError> {
    match team {
        Some(team) if team.id == membership.team_id && team.is_led_by(&membership.employee_id) => {
            Err(DomainError::InvalidOperation(format!(
                "Employee {} is the leader of team '{}' and cannot be removed from it.",
                membership.employee_id, team.name
            )))
        }
        _ => Ok(()),
    }
}

/// Replacing a membership row must not detach the leader from their team
pub fn check_membership_replacement(
    current: &TeamMembership,
    proposed: &NewTeamMembership,
    team: Option<&Team>,
) -> Result<(), DomainError> {
    if current.links(&proposed.team_id, &proposed.employee_id) {
        return Ok(());
    }
    check_membership_removal(current, team)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use super::*;
    use crate::domain::entities::{EmployeeId, TeamId};

    fn stored(employee_id: EmployeeId, work_type: WorkType, pct: Option<i16>) -> WorkArrangement {
        WorkArrangement {
            id: WorkArrangementId::new(),
            employee_id,
            work_type,
            percentage: pct,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn proposal(employee_id: EmployeeId, work_type: WorkType, pct: Option<i16>) -> NewWorkArrangement {
        NewWorkArrangement {
            employee_id,
            work_type,
            percentage: pct,
        }
    }

    fn team_led_by(leader: EmployeeId) -> Team {
        Team {
            id: TeamId::new(),
            name: "Back end".to_string(),
            leader_id: leader,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn membership(team_id: TeamId, employee_id: EmployeeId) -> TeamMembership {
        TeamMembership {
            id: MembershipId::new(),
            team_id,
            employee_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn name_accepts_letters_digits_space_underscore() {
        assert!(validate_name("name", "John Doe").is_ok());
        assert!(validate_name("name", "team_42").is_ok());
        assert!(validate_name("name", "Zoë").is_ok());
    }

    #[test]
    fn name_rejects_other_characters() {
        for bad in ["John Doe!", "a@b", "Back-end", "x.y", "a\u{203F}b", "team\u{FE4F}", "\u{301}"] {
            let err = validate_name("name", bad).unwrap_err();
            assert_eq!(err.code(), "invalid_format", "{bad}");
        }
    }

    #[test]
    fn empty_name_is_required() {
        assert_eq!(validate_name("name", "").unwrap_err().code(), "required");
    }

    #[test]
    fn overlong_name_rejected() {
        let long = "a".repeat(NAME_MAX_LEN + 1);
        assert_eq!(
            validate_name("name", &long).unwrap_err().code(),
            "invalid_format"
        );
    }

    #[test]
    fn employee_id_rejects_space_and_at() {
        assert!(validate_employee_id("a1234b").is_ok());
        assert_eq!(
            validate_employee_id("a1234b@").unwrap_err().code(),
            "invalid_format"
        );
        assert_eq!(
            validate_employee_id("a12 34b").unwrap_err().code(),
            "invalid_format"
        );
        assert_eq!(validate_employee_id("").unwrap_err().code(), "required");
    }

    #[test]
    fn employee_id_rejects_connector_punctuation_and_marks() {
        for bad in ["a\u{203F}b", "b\u{FE4F}", "e\u{301}"] {
            assert_eq!(validate_employee_id(bad).unwrap_err().code(), "invalid_format", "{bad}");
        }
    }

    #[test]
    fn names_accept_non_ascii_letters_and_digits() {
        assert!(validate_name("name", "José Núñez_2").is_ok());
        assert!(validate_employee_id("Ñ_١٢").is_ok());
    }

    #[test]
    fn hourly_rate_parsing() {
        assert_eq!(parse_hourly_rate("12.25").unwrap().to_string(), "12.25");
        assert_eq!(parse_hourly_rate("17.3").unwrap().to_string(), "17.30");
        assert_eq!(parse_hourly_rate("999.99").unwrap().to_string(), "999.99");
        assert_eq!(parse_hourly_rate("0").unwrap().to_string(), "0.00");
    }

    #[test]
    fn hourly_rate_rejections() {
        for bad in ["12.25b", "12.255", "1000", "-1", ""] {
            let err = parse_hourly_rate(bad).unwrap_err();
            assert_eq!(err.code(), "invalid_format", "{bad}");
        }
    }

    #[test]
    fn hourly_rate_trailing_zeros_are_not_extra_places() {
        let rate = Decimal::from_str("12.2500").unwrap();
        assert!(validate_hourly_rate(rate).is_ok());
    }

    #[test]
    fn percentage_bounds() {
        assert_eq!(validate_percentage(None).unwrap(), None);
        assert_eq!(validate_percentage(Some(0)).unwrap(), Some(0));
        assert_eq!(validate_percentage(Some(100)).unwrap(), Some(100));
        assert!(validate_percentage(Some(-40)).is_err());
        assert!(validate_percentage(Some(140)).is_err());
    }

    #[test]
    fn part_time_without_percentage_is_required() {
        let employee = EmployeeId::new();
        let err = check_work_arrangement(
            &proposal(employee, WorkType::PartTime, None),
            &[],
            WriteMode::Create,
        )
        .unwrap_err();
        assert_eq!(err.code(), "required");
    }

    #[test]
    fn full_time_on_empty_employee_is_allowed() {
        let employee = EmployeeId::new();
        assert!(check_work_arrangement(
            &proposal(employee, WorkType::FullTime, None),
            &[],
            WriteMode::Create,
        )
        .is_ok());
    }

    #[test]
    fn second_arrangement_after_full_time_conflicts() {
        let employee = EmployeeId::new();
        let rows = [stored(employee, WorkType::FullTime, None)];

        for work_type in [WorkType::FullTime, WorkType::PartTime] {
            let err = check_work_arrangement(
                &proposal(employee, work_type, Some(10)),
                &rows,
                WriteMode::Create,
            )
            .unwrap_err();
            assert_eq!(err.code(), "conflict");
        }
    }

    #[test]
    fn full_time_after_part_time_conflicts() {
        let employee = EmployeeId::new();
        let rows = [stored(employee, WorkType::PartTime, Some(40))];
        let err = check_work_arrangement(
            &proposal(employee, WorkType::FullTime, None),
            &rows,
            WriteMode::Create,
        )
        .unwrap_err();
        assert!(err.to_string().contains("another work assignment"));
    }

    #[test]
    fn part_time_sum_capped_at_100() {
        let employee = EmployeeId::new();
        let rows = [
            stored(employee, WorkType::PartTime, Some(40)),
            stored(employee, WorkType::PartTime, Some(40)),
        ];

        assert!(check_work_arrangement(
            &proposal(employee, WorkType::PartTime, Some(20)),
            &rows,
            WriteMode::Create,
        )
        .is_ok());

        let err = check_work_arrangement(
            &proposal(employee, WorkType::PartTime, Some(21)),
            &rows,
            WriteMode::Create,
        )
        .unwrap_err();
        assert_eq!(err.code(), "conflict");
        assert!(err.to_string().contains("exceeds 100"));
    }

    #[test]
    fn update_skips_row_being_replaced() {
        let employee = EmployeeId::new();
        let target = stored(employee, WorkType::PartTime, Some(60));
        let other = stored(employee, WorkType::PartTime, Some(30));
        let rows = [target.clone(), other];

        // 30 + 70 fits once the old 60 is excluded
        assert!(check_work_arrangement(
            &proposal(employee, WorkType::PartTime, Some(70)),
            &rows,
            WriteMode::Update(target.id),
        )
        .is_ok());

        assert!(check_work_arrangement(
            &proposal(employee, WorkType::PartTime, Some(71)),
            &rows,
            WriteMode::Update(target.id),
        )
        .is_err());
    }

    #[test]
    fn update_exempt_from_coexistence_rules() {
        let employee = EmployeeId::new();
        let full = stored(employee, WorkType::FullTime, None);
        let part = stored(employee, WorkType::PartTime, Some(40));
        let rows = [full.clone(), part.clone()];

        assert!(check_work_arrangement(
            &proposal(employee, WorkType::PartTime, Some(40)),
            &rows,
            WriteMode::Update(full.id),
        )
        .is_ok());
        assert!(check_work_arrangement(
            &proposal(employee, WorkType::FullTime, None),
            &rows,
            WriteMode::Update(part.id),
        )
        .is_ok());
    }

    #[test]
    fn other_employees_rows_are_ignored() {
        let employee = EmployeeId::new();
        let rows = [stored(EmployeeId::new(), WorkType::FullTime, None)];
        assert!(check_work_arrangement(
            &proposal(employee, WorkType::FullTime, None),
            &rows,
            WriteMode::Create,
        )
        .is_ok());
    }

    #[test]
    fn duplicate_membership_conflicts() {
        let team = TeamId::new();
        let employee = EmployeeId::new();
        let existing = membership(team, employee);
        let proposed = NewTeamMembership {
            team_id: team,
            employee_id: employee,
        };

        let err =
            check_membership_unique(&proposed, &[existing.clone()], WriteMode::Create).unwrap_err();
        assert_eq!(err.code(), "conflict");
        assert!(err.to_string().contains("already a member"));

        assert!(
            check_membership_unique(&proposed, &[existing.clone()], WriteMode::Update(existing.id))
                .is_ok()
        );
    }

    #[test]
    fn leader_membership_cannot_be_removed_while_team_exists() {
        let leader = EmployeeId::new();
        let team = team_led_by(leader);
        let row = membership(team.id, leader);

        let err = check_membership_removal(&row, Some(&team)).unwrap_err();
        assert_eq!(err.code(), "invalid_operation");

        // team already gone
        assert!(check_membership_removal(&row, None).is_ok());
    }

    #[test]
    fn non_leader_membership_can_be_removed() {
        let team = team_led_by(EmployeeId::new());
        let row = membership(team.id, EmployeeId::new());
        assert!(check_membership_removal(&row, Some(&team)).is_ok());
    }

    #[test]
    fn replacing_leader_row_with_same_pair_is_allowed() {
        let leader = EmployeeId::new();
        let team = team_led_by(leader);
        let row = membership(team.id, leader);

        let same = NewTeamMembership {
            team_id: team.id,
            employee_id: leader,
        };
        assert!(check_membership_replacement(&row, &same, Some(&team)).is_ok());

        let moved = NewTeamMembership {
            team_id: team.id,
            employee_id: EmployeeId::new(),
        };
        assert!(check_membership_replacement(&row, &moved, Some(&team)).is_err());
    }
}
