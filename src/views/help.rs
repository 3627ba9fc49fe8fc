use crate::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickLink {
    pub label: &'static str,
    pub route: Option<Route>,
}

pub const SUPPORT_EMAIL: &str = "support@edux.com";
pub const SUPPORT_PHONE: &str = "+123 456 7890";

pub const FAQS: [Faq; 3] = [
    Faq {
        question: "How do I enroll in a course?",
        answer: "Go to the Courses page, find your desired course, and click 'Enroll Now'.",
    },
    Faq {
        question: "Where can I see my enrolled courses?",
        answer: "Navigate to your profile page to see your enrolled courses.",
    },
    Faq {
        question: "Can I unroll from a course?",
        answer: "Yes, you can unroll from a course by viewing the course on your profile page and clicking 'Unroll'.",
    },
];

pub const QUICK_LINKS: [QuickLink; 3] = [
    QuickLink {
        label: "View Courses",
        route: Some(Route::Courses),
    },
    QuickLink {
        label: "My Profile",
        route: Some(Route::Home),
    },
    QuickLink {
        label: "Contact Support",
        route: None,
    },
];

/// Static help page.
#[derive(Debug, Default, Clone, Copy)]
pub struct HelpView;

impl HelpView {
    pub fn faqs(&self) -> &'static [Faq] {
        &FAQS
    }

    pub fn quick_links(&self) -> &'static [QuickLink] {
        &QUICK_LINKS
    }

    pub fn contacts(&self) -> [&'static str; 2] {
        [SUPPORT_EMAIL, SUPPORT_PHONE]
    }
}
