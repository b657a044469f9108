use troopbook_core::models::AttendanceEntry;
use troopbook_core::schedule::DateDisplay;
use troopbook_core::utils::truncate_string;
use troopbook_core::{Event, Member, MemberId, OwnedRow};

/// Longest event name shown in the list before truncating
const NAME_COLUMN_WIDTH: usize = 40;

pub fn print_schedule(title: &str, rows: &[OwnedRow]) {
    println!("{}", title);
    if rows.is_empty() {
        println!("  (no events)");
        return;
    }
    for row in rows {
        let marker = if row.highlighted { '*' } else { ' ' };
        let date = match row.date_display {
            DateDisplay::Plain => row.date_label.clone(),
            DateDisplay::Tag(ref branch) if !branch.label().is_empty() => {
                format!("{} [{}]", row.date_label, branch)
            }
            DateDisplay::Tag(_) => row.date_label.clone(),
        };
        println!(
            "{} {:<28} {}",
            marker,
            date,
            truncate_string(row.event.name(), NAME_COLUMN_WIDTH)
        );
    }
}

pub fn print_event(event: &Event, checklist: &[AttendanceEntry<'_>]) {
    println!("{}", event.name());
    println!("  Date:   {}", event.formatted_date());
    println!("  Branch: {}", event.branch());
    if !event.event_type().label().is_empty() {
        println!("  Type:   {}", event.event_type());
    }
    println!("  Attendance: {}", event.attendance_count());
    for entry in checklist {
        let mark = if entry.present { 'x' } else { ' ' };
        println!("    [{}] {}", mark, entry.member.name);
    }

    // records for members no longer on the roster
    let listed = |id: &MemberId| checklist.iter().any(|entry| &entry.member.id == id);
    for record in event.attendance().iter().filter(|r| !listed(&r.member_id)) {
        println!("    [x] {} (not on roster)", record.member_id);
    }
}

pub fn print_members(members: &[Member]) {
    if members.is_empty() {
        println!("(no members)");
        return;
    }
    for member in members {
        println!("{:<12} {}", member.id.as_str(), member.name);
    }
}
