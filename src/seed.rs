//! Demo data: the default accounts and the sample employee set.
//!
//! Used by `admin seed`. Seeding wipes both tables first.

use crate::application::services::{EmployeeService, Registration, UserService};
use crate::domain::entities::{NewEmployee, Role};
use crate::domain::repositories::{EmployeeRepository, UserRepository};
use crate::error::AppError;

/// A default account created by seeding.
pub struct DefaultUser {
    pub username: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

pub const DEFAULT_USERS: [DefaultUser; 2] = [
    DefaultUser {
        username: "admin",
        email: "admin@ultraship.com",
        password: "admin123",
        role: Role::Admin,
    },
    DefaultUser {
        username: "employee",
        email: "employee@ultraship.com",
        password: "emp123",
        role: Role::Employee,
    },
];

pub struct SampleEmployee {
    pub name: &'static str,
    pub age: i32,
    pub class_name: &'static str,
    pub subjects: &'static [&'static str],
    pub attendance: f64,
    pub email: &'static str,
    pub department: &'static str,
    pub position: &'static str,
    pub salary: f64,
}

impl SampleEmployee {
    pub fn to_new_employee(&self) -> NewEmployee {
        NewEmployee {
            name: self.name.to_string(),
            age: self.age,
            class_name: self.class_name.to_string(),
            subjects: self.subjects.iter().map(|s| s.to_string()).collect(),
            attendance: self.attendance,
            email: self.email.to_string(),
            department: Some(self.department.to_string()),
            position: Some(self.position.to_string()),
            salary: Some(self.salary),
        }
    }
}

pub const SAMPLE_EMPLOYEES: &[SampleEmployee] = &[
    SampleEmployee {
        name: "John Smith",
        age: 32,
        class_name: "Engineering",
        subjects: &["Mathematics", "Physics", "Computer Science"],
        attendance: 95.0,
        email: "john.smith@ultraship.com",
        department: "IT",
        position: "Senior Developer",
        salary: 95000.0,
    },
    SampleEmployee {
        name: "Sarah Johnson",
        age: 28,
        class_name: "Marketing",
        subjects: &["Business", "Communication", "Design"],
        attendance: 88.0,
        email: "sarah.johnson@ultraship.com",
        department: "Marketing",
        position: "Marketing Manager",
        salary: 75000.0,
    },
    SampleEmployee {
        name: "Michael Chen",
        age: 35,
        class_name: "Finance",
        subjects: &["Accounting", "Economics", "Statistics"],
        attendance: 92.0,
        email: "michael.chen@ultraship.com",
        department: "Finance",
        position: "Financial Analyst",
        salary: 82000.0,
    },
    SampleEmployee {
        name: "Emily Davis",
        age: 26,
        class_name: "HR",
        subjects: &["Psychology", "Management", "Communication"],
        attendance: 90.0,
        email: "emily.davis@ultraship.com",
        department: "Human Resources",
        position: "HR Specialist",
        salary: 65000.0,
    },
    SampleEmployee {
        name: "David Wilson",
        age: 40,
        class_name: "Engineering",
        subjects: &["Mathematics", "Physics", "Engineering"],
        attendance: 98.0,
        email: "david.wilson@ultraship.com",
        department: "IT",
        position: "Tech Lead",
        salary: 120000.0,
    },
    SampleEmployee {
        name: "Lisa Anderson",
        age: 29,
        class_name: "Sales",
        subjects: &["Business", "Communication", "Negotiation"],
        attendance: 85.0,
        email: "lisa.anderson@ultraship.com",
        department: "Sales",
        position: "Sales Manager",
        salary: 70000.0,
    },
    SampleEmployee {
        name: "Robert Brown",
        age: 33,
        class_name: "Operations",
        subjects: &["Management", "Logistics", "Operations"],
        attendance: 87.0,
        email: "robert.brown@ultraship.com",
        department: "Operations",
        position: "Operations Manager",
        salary: 88000.0,
    },
    SampleEmployee {
        name: "Jennifer Martinez",
        age: 27,
        class_name: "Design",
        subjects: &["Design", "Art", "User Experience"],
        attendance: 91.0,
        email: "jennifer.martinez@ultraship.com",
        department: "Design",
        position: "UI/UX Designer",
        salary: 72000.0,
    },
    SampleEmployee {
        name: "James Taylor",
        age: 31,
        class_name: "Engineering",
        subjects: &["Computer Science", "Software Engineering", "Algorithms"],
        attendance: 94.0,
        email: "james.taylor@ultraship.com",
        department: "IT",
        position: "Software Engineer",
        salary: 85000.0,
    },
    SampleEmployee {
        name: "Amanda White",
        age: 25,
        class_name: "Customer Service",
        subjects: &["Communication", "Psychology", "Service"],
        attendance: 89.0,
        email: "amanda.white@ultraship.com",
        department: "Customer Service",
        position: "Customer Support Specialist",
        salary: 55000.0,
    },
    SampleEmployee {
        name: "Christopher Lee",
        age: 36,
        class_name: "Engineering",
        subjects: &["Mathematics", "Physics", "Engineering Design"],
        attendance: 96.0,
        email: "christopher.lee@ultraship.com",
        department: "IT",
        position: "Senior Software Architect",
        salary: 135000.0,
    },
    SampleEmployee {
        name: "Maria Garcia",
        age: 30,
        class_name: "Marketing",
        subjects: &["Digital Marketing", "Analytics", "Content Strategy"],
        attendance: 93.0,
        email: "maria.garcia@ultraship.com",
        department: "Marketing",
        position: "Digital Marketing Manager",
        salary: 88000.0,
    },
    SampleEmployee {
        name: "Thomas Anderson",
        age: 38,
        class_name: "Finance",
        subjects: &["Financial Planning", "Risk Management", "Investment"],
        attendance: 91.0,
        email: "thomas.anderson@ultraship.com",
        department: "Finance",
        position: "Senior Financial Analyst",
        salary: 95000.0,
    },
    SampleEmployee {
        name: "Jessica Kim",
        age: 24,
        class_name: "Design",
        subjects: &["Graphic Design", "Branding", "Visual Communication"],
        attendance: 86.0,
        email: "jessica.kim@ultraship.com",
        department: "Design",
        position: "Graphic Designer",
        salary: 60000.0,
    },
    SampleEmployee {
        name: "Daniel Rodriguez",
        age: 34,
        class_name: "Sales",
        subjects: &["Sales Strategy", "Customer Relations", "Negotiation"],
        attendance: 92.0,
        email: "daniel.rodriguez@ultraship.com",
        department: "Sales",
        position: "Senior Sales Executive",
        salary: 92000.0,
    },
    SampleEmployee {
        name: "Sophia Williams",
        age: 29,
        class_name: "HR",
        subjects: &["Talent Acquisition", "Employee Relations", "Training"],
        attendance: 88.0,
        email: "sophia.williams@ultraship.com",
        department: "Human Resources",
        position: "HR Manager",
        salary: 78000.0,
    },
    SampleEmployee {
        name: "Ryan Murphy",
        age: 27,
        class_name: "Operations",
        subjects: &["Supply Chain", "Process Optimization", "Quality Control"],
        attendance: 90.0,
        email: "ryan.murphy@ultraship.com",
        department: "Operations",
        position: "Operations Analyst",
        salary: 68000.0,
    },
    SampleEmployee {
        name: "Olivia Thompson",
        age: 31,
        class_name: "Customer Service",
        subjects: &["Customer Support", "Problem Solving", "Communication"],
        attendance: 87.0,
        email: "olivia.thompson@ultraship.com",
        department: "Customer Service",
        position: "Customer Service Manager",
        salary: 72000.0,
    },
    SampleEmployee {
        name: "William Davis",
        age: 39,
        class_name: "Engineering",
        subjects: &["System Architecture", "Cloud Computing", "DevOps"],
        attendance: 97.0,
        email: "william.davis@ultraship.com",
        department: "IT",
        position: "DevOps Engineer",
        salary: 110000.0,
    },
    SampleEmployee {
        name: "Emma Wilson",
        age: 26,
        class_name: "Marketing",
        subjects: &["Social Media", "Content Creation", "SEO"],
        attendance: 84.0,
        email: "emma.wilson@ultraship.com",
        department: "Marketing",
        position: "Social Media Specialist",
        salary: 58000.0,
    },
    SampleEmployee {
        name: "Alexander Brown",
        age: 33,
        class_name: "Finance",
        subjects: &["Accounting", "Tax Planning", "Auditing"],
        attendance: 94.0,
        email: "alexander.brown@ultraship.com",
        department: "Finance",
        position: "Accountant",
        salary: 70000.0,
    },
];

/// Counts reported after seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub employees: usize,
}

/// Clears both tables, then creates the default accounts and sample employees.
///
/// # Errors
///
/// Returns the first service error; earlier inserts are kept.
pub async fn seed(
    employees: &EmployeeService<dyn EmployeeRepository>,
    users: &UserService<dyn UserRepository>,
) -> Result<SeedSummary, AppError> {
    let removed_employees = employees.delete_all().await?;
    let removed_users = users.delete_all().await?;
    tracing::info!(removed_employees, removed_users, "Cleared existing data");

    for user in &DEFAULT_USERS {
        users
            .create_user(Registration {
                username: user.username.to_string(),
                email: user.email.to_string(),
                password: user.password.to_string(),
                role: user.role,
            })
            .await?;
    }

    for sample in SAMPLE_EMPLOYEES {
        employees.create(sample.to_new_employee()).await?;
    }

    let summary = SeedSummary {
        users: DEFAULT_USERS.len(),
        employees: SAMPLE_EMPLOYEES.len(),
    };
    tracing::info!(users = summary.users, employees = summary.employees, "Database seeded");

    Ok(summary)
}
