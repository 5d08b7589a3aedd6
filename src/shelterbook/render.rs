use chrono::{DateTime, Local, NaiveDate, Utc};
use colored::*;
use shelterbook::commands::{Account, AnimalRow, CmdMessage, MessageLevel, RequestRow};
use shelterbook::config::{AppConfig, CONFIG_KEYS};
use shelterbook::index::Indexed;
use shelterbook::model::{RequestStatus, Role, Shelter, User};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const NAME_WIDTH: usize = 24;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_validation_errors(errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    println!("{}", "Nothing was saved:".red().bold());
    for error in errors {
        println!("  {} {}", "✗".red(), error);
    }
}

pub fn print_shelters(shelters: &[Indexed<Shelter>]) {
    if shelters.is_empty() {
        println!("No shelters found.");
        return;
    }
    for s in shelters {
        let places = format!("{}/{}", s.item.animal_count, s.item.capacity);
        let places = if s.item.has_room() {
            places.green()
        } else {
            places.red()
        };
        println!(
            "{} {}  {}  {}  {}",
            index_label(s.index),
            pad_to_width(&s.item.name, NAME_WIDTH).bold(),
            places,
            s.item.phone.dimmed(),
            s.item.address
        );
    }
}

pub fn print_animals(animals: &[Indexed<AnimalRow>]) {
    if animals.is_empty() {
        println!("No animals found.");
        return;
    }
    for row in animals {
        let a = &row.item.animal;
        let shelter = row
            .item
            .shelter
            .as_ref()
            .map_or_else(|| "(no shelter)".red().to_string(), |s| s.name.clone());
        println!(
            "{} {}  {} {}, {} y.o.  in {}  {}",
            index_label(row.index),
            pad_to_width(&a.name, NAME_WIDTH).bold(),
            a.species,
            a.breed.dimmed(),
            a.age,
            shelter,
            format!("since {}", a.date_of_delivery).dimmed()
        );
    }
}

pub fn print_requests(requests: &[Indexed<RequestRow>]) {
    if requests.is_empty() {
        println!("No requests found.");
        return;
    }
    for row in requests {
        let r = &row.item.request;
        println!(
            "{} {}  {}  {} → {}  {}",
            index_label(row.index),
            pad_to_width(&r.name, NAME_WIDTH).bold(),
            status_label(r.status),
            row.item.user_name(),
            row.item.animal_name(),
            days_ago(r.request_create_date).dimmed()
        );
    }
}

pub fn print_users(users: &[Indexed<User>]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for u in users {
        println!(
            "{} {}  {}  {}  {}",
            index_label(u.index),
            pad_to_width(&u.item.full_name, NAME_WIDTH).bold(),
            role_label(u.item.role),
            u.item.email,
            u.item.phone_number.dimmed()
        );
    }
}

pub fn print_profile(user: &User) {
    println!("{}", user.full_name.bold());
    println!("  role:      {}", role_label(user.role));
    println!("  email:     {}", user.email);
    println!("  phone:     {}", user.phone_number);
    println!("  address:   {}", user.home_address);
    println!("  birthdate: {}", user.birthdate);
    println!("  id:        {}", user.id.to_string().dimmed());
}

pub fn print_account(account: &Account) {
    print_profile(&account.user);
    if let Some(at) = account.signed_in_at {
        println!("  signed in: {}", time_ago(at).dimmed());
    }
}

pub fn print_config(config: &AppConfig) {
    for key in CONFIG_KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn index_label(index: usize) -> ColoredString {
    format!("{:>3}.", index).yellow()
}

fn status_label(status: RequestStatus) -> ColoredString {
    let text = format!("{:<16}", status.description());
    match status {
        RequestStatus::Approved => text.green(),
        RequestStatus::Rejected => text.red(),
        RequestStatus::Pending => text.yellow(),
    }
}

fn role_label(role: Role) -> ColoredString {
    let text = format!("{:<8}", role.to_string());
    match role {
        Role::Admin => text.magenta(),
        Role::Personal => text.cyan(),
        Role::User => text.normal(),
    }
}

/// Pad or truncate to a display width, so wide characters line up.
fn pad_to_width(s: &str, width: usize) -> String {
    if s.width() <= width {
        return format!("{}{}", s, " ".repeat(width - s.width()));
    }

    let mut result = String::new();
    let mut current = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if current + w > width.saturating_sub(1) {
            break;
        }
        result.push(c);
        current += w;
    }
    result.push('…');
    current += 1;
    result.push_str(&" ".repeat(width.saturating_sub(current)));
    result
}

fn time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

fn days_ago(date: NaiveDate) -> String {
    let today = Local::now().date_naive();
    if date >= today {
        return "today".to_string();
    }
    let days = (today - date).num_days().unsigned_abs();
    let mut formatter = timeago::Formatter::new();
    formatter.num_items(1);
    formatter.convert(std::time::Duration::from_secs(days * 24 * 60 * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_to_display_width() {
        assert_eq!(pad_to_width("Rex", 5), "Rex  ");
        assert_eq!(pad_to_width("Барсик", 6), "Барсик");
        assert_eq!(pad_to_width("Warm Nest Shelter", 8), "Warm Ne…");
    }

    #[test]
    fn wide_characters_count_double() {
        let padded = pad_to_width("猫猫", 6);
        assert_eq!(padded.width(), 6);
    }

    #[test]
    fn dates_render_relative() {
        assert_eq!(days_ago(Local::now().date_naive()), "today");
        let earlier = Local::now().date_naive() - chrono::Duration::days(2);
        assert_eq!(days_ago(earlier), "2 days ago");
    }
}
