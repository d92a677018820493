use clinicdir_core::{Department, Hospital};
use clinicdir_search::{DoctorView, Page};
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => print_error(&format!("Failed to render JSON: {e}")),
    }
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_cache_note(cached: bool) {
    let source = if cached { "cache".green() } else { "store".yellow() };
    println!("{} {}", "Served from:".dimmed(), source);
}

pub fn doctors_table(doctors: &[DoctorView]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Rating", "Name", "Specialty", "Hospital", "Department", "Email"]);
    for doctor in doctors {
        builder.push_record([
            doctor.rating_label.as_str(),
            doctor.name.as_str(),
            doctor.specialty.as_str(),
            doctor.hospital.name.as_str(),
            doctor.department.as_ref().map_or("-", |d| d.name.as_str()),
            doctor.email.as_str(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_doctors(doctors: &[DoctorView]) {
    if doctors.is_empty() {
        println!("No doctors found.");
        return;
    }
    println!("{}", doctors_table(doctors));
    println!("Total: {}", doctors.len());
}

pub fn print_doctor_page(page: &Page<DoctorView>) {
    if page.items.is_empty() {
        println!("No doctors on page {} of {}.", page.page, page.total_pages);
        return;
    }
    println!("{}", doctors_table(&page.items));
    println!(
        "Page {} of {} ({} doctors)",
        page.page, page.total_pages, page.total
    );
}

pub fn print_hospitals(hospitals: &[Hospital]) {
    if hospitals.is_empty() {
        println!("No hospitals found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "Address", "Phone"]);
    for h in hospitals {
        builder.push_record([
            h.id.as_str(),
            h.name.as_str(),
            h.address.as_str(),
            h.phone.as_str(),
        ]);
    }
    println!("{}", builder.build().with(Style::rounded()));
}

pub fn print_departments(departments: &[Department]) {
    if departments.is_empty() {
        println!("No departments found.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name"]);
    for d in departments {
        builder.push_record([d.id.as_str(), d.name.as_str()]);
    }
    println!("{}", builder.build().with(Style::rounded()));
}
