//! Curated seed data.
//!
//! Symptom vocabulary, confounders, reasoning keywords and advice for the
//! diseases the generator ships with. Not clinical guidance.

/// Static form of a curated disease.
pub(crate) struct Seed {
    pub name: &'static str,
    pub symptoms: &'static [&'static str],
    pub confounders: &'static [&'static str],
    pub reasoning: &'static str,
    pub recommendation: &'static str,
}

/// Diseases generated by default, in output order.
pub const DEFAULT_DISEASES: &[&str] = &[
    "Dengue Fever", "Malaria", "Typhoid Fever", "Pneumonia",
    "Tuberculosis", "Urinary Tract Infection", "Diabetes Mellitus", "Hypertension",
    "Coronary Heart Disease", "Stroke", "Asthma", "COPD",
    "Influenza", "Common Cold", "Gastroenteritis", "Food Poisoning",
    "Hepatitis", "Peptic Ulcer", "GERD", "Migraine",
    "Anemia", "Arthritis", "Skin Allergy", "Fungal Skin Infection",
    "Tonsillitis", "Sinusitis", "Kidney Stones", "Chronic Kidney Disease",
    "Thyroid Disorders", "Depression", "Anxiety Disorder", "Heart Attack",
    "Gallstones", "PCOS", "Meningitis", "Jaundice",
    "Eczema", "Gout", "Conjunctivitis", "Otitis Media",
    "Appendicitis", "Chikungunya", "Lupus", "Bronchitis",
    "IBS", "Schistosomiasis", "Dengue+Chik", "Hepatitis B",
    "Diabetic Ketoacidosis",
];

pub(crate) const SEEDS: &[Seed] = &[
    Seed {
        name: "Dengue Fever",
        symptoms: &["fever", "severe headache", "body pain", "rash", "nausea", "joint pain"],
        confounders: &["Chikungunya", "Typhoid Fever", "Viral Fever"],
        reasoning: "fever; severe headache; body pain; rash",
        recommendation: "Get dengue test; Drink fluids; Rest and monitor fever",
    },
    Seed {
        name: "Malaria",
        symptoms: &["fever", "chills", "sweating", "headache", "body pain"],
        confounders: &["Dengue Fever", "Typhoid Fever", "Viral Fever"],
        reasoning: "fever; chills; sweating",
        recommendation: "Get malaria test; Use mosquito net; Visit clinic",
    },
    Seed {
        name: "Typhoid Fever",
        symptoms: &["prolonged fever", "abdominal pain", "weakness", "headache"],
        confounders: &["Gastroenteritis", "Dengue Fever", "Urinary Tract Infection"],
        reasoning: "prolonged fever; abdominal pain",
        recommendation: "Get Widal/blood test; Start antibiotics if prescribed; Stay hydrated",
    },
    Seed {
        name: "Pneumonia",
        symptoms: &["high fever", "cough with mucus", "chest pain", "shortness of breath"],
        confounders: &["Bronchitis", "Tuberculosis", "COVID-19"],
        reasoning: "cough; mucus; chest pain",
        recommendation: "Consult doctor; Chest X-ray; Complete antibiotics",
    },
    Seed {
        name: "Tuberculosis",
        symptoms: &["persistent cough", "weight loss", "night sweats", "fever"],
        confounders: &["Pneumonia", "Lung Cancer", "Bronchitis"],
        reasoning: "persistent cough; night sweats; weight loss",
        recommendation: "Get TB test; Take full medication course; Nutrition support",
    },
    Seed {
        name: "Urinary Tract Infection",
        symptoms: &["burning urination", "lower abdominal pain", "frequent urination", "cloudy urine"],
        confounders: &["Kidney Infection", "Dehydration", "Kidney Stones"],
        reasoning: "burning urination; abdominal pain",
        recommendation: "Drink water; Get urine test; Take antibiotics if prescribed",
    },
    Seed {
        name: "Diabetes Mellitus",
        symptoms: &["increased thirst", "frequent urination", "fatigue", "weight loss"],
        confounders: &["Thyroid Disorders", "Dehydration", "Anemia"],
        reasoning: "thirst; urination; fatigue",
        recommendation: "Get fasting blood sugar test; Stay hydrated; Follow diabetic diet",
    },
    Seed {
        name: "Hypertension",
        symptoms: &["headache", "nosebleed", "dizziness", "blurred vision"],
        confounders: &["Anxiety", "Migraine", "Stroke"],
        reasoning: "headache; nosebleed; high blood pressure signs",
        recommendation: "Check blood pressure; Reduce salt; Consult doctor",
    },
    Seed {
        name: "Coronary Heart Disease",
        symptoms: &["chest pain", "shortness of breath", "sweating", "nausea"],
        confounders: &["Heart Attack", "Angina", "Anxiety"],
        reasoning: "chest pain; sweating; breathlessness",
        recommendation: "Seek emergency care if severe; ECG; Follow cardiology advice",
    },
    Seed {
        name: "Stroke",
        symptoms: &["sudden weakness", "facial droop", "slurred speech", "confusion"],
        confounders: &["Migraine", "Seizure", "Hypoglycemia"],
        reasoning: "sudden neurological deficit; speech problem",
        recommendation: "Call emergency; Get CT/MRI; Immediate medical attention",
    },
    Seed {
        name: "Asthma",
        symptoms: &["wheezing", "shortness of breath", "chest tightness", "cough"],
        confounders: &["Bronchitis", "COPD", "Allergic Reaction"],
        reasoning: "wheezing; breathlessness; cough",
        recommendation: "Use inhaler; Avoid triggers; See doctor if severe",
    },
    Seed {
        name: "COPD",
        symptoms: &["chronic cough", "shortness of breath", "sputum production", "wheezing"],
        confounders: &["Asthma", "Bronchitis", "Pneumonia"],
        reasoning: "chronic cough; sputum; breathlessness",
        recommendation: "Avoid smoke; Use inhaler as prescribed; Pulmonary check-up",
    },
    Seed {
        name: "Influenza",
        symptoms: &["fever", "cough", "sore throat", "body ache"],
        confounders: &["Common Cold", "Viral Fever", "COVID-19"],
        reasoning: "fever; cough; body ache",
        recommendation: "Rest; Drink fluids; Paracetamol if needed",
    },
    Seed {
        name: "Common Cold",
        symptoms: &["sneezing", "runny nose", "sore throat", "mild cough"],
        confounders: &["Allergic Rhinitis", "Influenza", "Sinusitis"],
        reasoning: "sneezing; runny nose; sore throat",
        recommendation: "Rest; Warm fluids; Saline gargle",
    },
    Seed {
        name: "Gastroenteritis",
        symptoms: &["diarrhea", "vomiting", "abdominal cramps", "fever"],
        confounders: &["Food Poisoning", "Cholera", "IBS"],
        reasoning: "diarrhea; vomiting; abdominal cramps",
        recommendation: "Drink ORS; Rest; Avoid outside food",
    },
    Seed {
        name: "Food Poisoning",
        symptoms: &["vomiting", "diarrhea", "abdominal pain", "nausea"],
        confounders: &["Gastroenteritis", "Cholera", "Typhoid"],
        reasoning: "vomiting; diarrhea; abdominal pain",
        recommendation: "Drink ORS; Avoid solid food; Visit doctor if persists",
    },
    Seed {
        name: "Hepatitis",
        symptoms: &["jaundice", "dark urine", "abdominal pain", "nausea"],
        confounders: &["Jaundice from other causes", "Gallstones", "Liver Infection"],
        reasoning: "jaundice; dark urine; abdominal pain",
        recommendation: "Get liver function test; Avoid alcohol; Rest",
    },
    Seed {
        name: "Peptic Ulcer",
        symptoms: &["upper abdominal pain", "black stool", "vomiting blood", "heartburn"],
        confounders: &["Gastritis", "GI bleed", "Gastric cancer"],
        reasoning: "upper abdominal pain; black stool; vomiting blood",
        recommendation: "Consult gastroenterologist; Avoid NSAIDs; Get endoscopy if advised",
    },
    Seed {
        name: "GERD",
        symptoms: &["heartburn", "acid reflux", "sour taste", "bloating"],
        confounders: &["Peptic Ulcer", "Gastritis", "Acid Reflux"],
        reasoning: "heartburn; sour taste; reflux",
        recommendation: "Avoid spicy food; Eat smaller meals; Take antacids",
    },
    Seed {
        name: "Migraine",
        symptoms: &["severe headache", "sensitivity to light", "nausea", "visual aura"],
        confounders: &["Tension Headache", "Stroke", "Sinusitis"],
        reasoning: "severe headache; light sensitivity; nausea",
        recommendation: "Rest in dark room; Prescribed migraine meds; Hydrate",
    },
    Seed {
        name: "Anemia",
        symptoms: &["fatigue", "pale skin", "dizziness", "shortness of breath"],
        confounders: &["Thyroid Disorders", "Vitamin Deficiency", "Chronic Disease"],
        reasoning: "fatigue; pale skin; dizziness",
        recommendation: "Eat iron-rich foods; Take iron supplements; Get blood test",
    },
    Seed {
        name: "Arthritis",
        symptoms: &["joint pain", "stiffness", "swelling", "reduced mobility"],
        confounders: &["Gout", "Rheumatoid Arthritis", "Injury"],
        reasoning: "joint pain; stiffness; swelling",
        recommendation: "Consult doctor; Light exercise; Pain relief as advised",
    },
    Seed {
        name: "Skin Allergy",
        symptoms: &["rash", "itching", "redness", "hives"],
        confounders: &["Eczema", "Fungal Infection", "Contact Dermatitis"],
        reasoning: "rash; itching; redness",
        recommendation: "Apply prescribed cream; Avoid allergens; Keep area clean",
    },
    Seed {
        name: "Fungal Skin Infection",
        symptoms: &["ring-shaped rash", "itching", "scaly skin", "spreading lesion"],
        confounders: &["Eczema", "Bacterial Infection", "Skin Allergy"],
        reasoning: "ring lesion; itching; scaly",
        recommendation: "Use antifungal cream; Keep area dry; See dermatologist",
    },
    Seed {
        name: "Tonsillitis",
        symptoms: &["sore throat", "swollen glands", "fever", "difficulty swallowing"],
        confounders: &["Pharyngitis", "Strep Throat", "Common Cold"],
        reasoning: "sore throat; swollen glands; fever",
        recommendation: "Gargle with salt water; Take antibiotics if bacterial; Rest",
    },
    Seed {
        name: "Sinusitis",
        symptoms: &["facial pain", "blocked nose", "headache", "thick nasal discharge"],
        confounders: &["Allergic Rhinitis", "Common Cold", "Migraine"],
        reasoning: "facial pain; blocked nose; nasal discharge",
        recommendation: "Steam inhalation; Nasal spray; Consult ENT if chronic",
    },
    Seed {
        name: "Kidney Stones",
        symptoms: &["severe flank pain", "blood in urine", "nausea", "sweating"],
        confounders: &["Kidney Infection", "Appendicitis", "Gallstones"],
        reasoning: "flank pain; hematuria; severe pain",
        recommendation: "Hydrate; Pain control; Ultrasound/CT as advised",
    },
    Seed {
        name: "Chronic Kidney Disease",
        symptoms: &["fatigue", "reduced urine output", "swelling", "nausea"],
        confounders: &["Dehydration", "Heart Failure", "Kidney Infection"],
        reasoning: "reduced kidney function; swelling; fatigue",
        recommendation: "Consult nephrologist; Check renal function tests; Diet modification",
    },
    Seed {
        name: "Thyroid Disorders",
        symptoms: &["weight change", "fatigue", "hair loss", "palpitations"],
        confounders: &["Anemia", "Mental health issues", "Hormonal imbalances"],
        reasoning: "weight change; fatigue; hair loss",
        recommendation: "Get thyroid function test; Start medication if needed; Follow up",
    },
    Seed {
        name: "Depression",
        symptoms: &["sad mood", "loss of interest", "sleep changes", "fatigue"],
        confounders: &["Anxiety", "Thyroid Disorder", "Sleep Disorder"],
        reasoning: "sadness; loss of interest; fatigue",
        recommendation: "Talk to counselor; Consider therapy; Maintain routine",
    },
    Seed {
        name: "Anxiety Disorder",
        symptoms: &["racing heart", "sweating", "worry", "insomnia"],
        confounders: &["Panic Attack", "Hyperthyroidism", "Cardiac issues"],
        reasoning: "anxiety; palpitations; sweating",
        recommendation: "Practice breathing exercises; Seek counseling; Medication if advised",
    },
    Seed {
        name: "Heart Attack",
        symptoms: &["severe chest pain", "sweating", "nausea", "shortness of breath"],
        confounders: &["Angina", "Gastroesophageal reflux", "Panic Attack"],
        reasoning: "severe chest pain; sweating; nausea",
        recommendation: "Call emergency; Chew aspirin if advised; Urgent hospital visit",
    },
    Seed {
        name: "Gallstones",
        symptoms: &["right upper quadrant pain", "nausea after fatty meals", "fever"],
        confounders: &["Gastritis", "Hepatitis", "Pancreatitis"],
        reasoning: "RUQ pain; fatty food trigger; nausea",
        recommendation: "Avoid fatty food; Ultrasound; Consult surgeon/gastroenterologist",
    },
    Seed {
        name: "PCOS",
        symptoms: &["irregular periods", "acne", "weight gain", "hirsutism"],
        confounders: &["Endometriosis", "Thyroid Disorder", "Hormonal imbalance"],
        reasoning: "irregular periods; acne; weight changes",
        recommendation: "Consult gynecologist; Lifestyle changes; Hormonal evaluation",
    },
    Seed {
        name: "Meningitis",
        symptoms: &["severe headache", "neck stiffness", "fever", "vomiting"],
        confounders: &["Migraine", "Encephalitis", "Sepsis"],
        reasoning: "neck stiffness; severe headache; fever",
        recommendation: "Emergency care; Hospitalization; Lumbar puncture if advised",
    },
    Seed {
        name: "Jaundice",
        symptoms: &["yellowing skin/eyes", "dark urine", "fatigue", "abdominal pain"],
        confounders: &["Hepatitis", "Gallstones", "Hemolytic anemia"],
        reasoning: "jaundice; dark urine; fatigue",
        recommendation: "Get liver tests; Avoid alcohol; Medical evaluation",
    },
    Seed {
        name: "Eczema",
        symptoms: &["dry itchy skin", "red patches", "scaly lesions", "flare-ups"],
        confounders: &["Skin Allergy", "Psoriasis", "Fungal Infection"],
        reasoning: "dry itchy skin; red patches; scaly lesions",
        recommendation: "Moisturize; Avoid triggers; Use prescribed topical meds",
    },
    Seed {
        name: "Gout",
        symptoms: &["sudden joint pain", "redness", "swelling", "big toe pain"],
        confounders: &["Arthritis", "Septic arthritis", "Trauma"],
        reasoning: "sudden joint pain; swelling; redness",
        recommendation: "Avoid purine-rich food; Take anti-inflammatory meds; See physician",
    },
    Seed {
        name: "Conjunctivitis",
        symptoms: &["red eyes", "itching", "discharge", "tearing"],
        confounders: &["Allergic conjunctivitis", "Dry eyes", "Uveitis"],
        reasoning: "red eyes; discharge; itching",
        recommendation: "Avoid touching eyes; Use eye drops; Consult ophthalmologist if worsening",
    },
    Seed {
        name: "Otitis Media",
        symptoms: &["ear pain", "fever", "reduced hearing", "discharge"],
        confounders: &["Ear wax impaction", "Sinusitis", "Mastoiditis"],
        reasoning: "ear pain; fever; hearing reduced",
        recommendation: "Ear drops as prescribed; Avoid water in ear; See ENT if severe",
    },
    Seed {
        name: "Appendicitis",
        symptoms: &["right lower abdominal pain", "nausea", "fever", "loss of appetite"],
        confounders: &["Gastroenteritis", "Kidney Stones", "Ovarian torsion"],
        reasoning: "RLQ pain; fever; nausea",
        recommendation: "Emergency surgery evaluation; Do not eat; Seek immediate care",
    },
    Seed {
        name: "Chikungunya",
        symptoms: &["fever", "severe joint pain", "rash", "fatigue"],
        confounders: &["Dengue Fever", "Viral Fever", "Arthritis"],
        reasoning: "fever; joint pain; rash",
        recommendation: "Rest; Hydrate; Pain control",
    },
    Seed {
        name: "Lupus",
        symptoms: &["joint pain", "rash", "fatigue", "photosensitivity"],
        confounders: &["Rheumatoid Arthritis", "Dermatomyositis", "Viral Infection"],
        reasoning: "autoimmune signs; rash; joint pain",
        recommendation: "Refer to rheumatology; Immunological tests; Manage symptoms",
    },
    Seed {
        name: "Bronchitis",
        symptoms: &["cough with/without sputum", "chest discomfort", "fatigue", "mild fever"],
        confounders: &["Pneumonia", "Asthma", "COPD"],
        reasoning: "cough; sputum; chest discomfort",
        recommendation: "Rest; Hydrate; Seek doctor if fever or worsening",
    },
    Seed {
        name: "IBS",
        symptoms: &["abdominal pain", "bloating", "constipation/diarrhea", "relief after defecation"],
        confounders: &["Gastritis", "Lactose Intolerance", "Inflammatory Bowel Disease"],
        reasoning: "abdominal pain; bloating; bowel irregularity",
        recommendation: "Diet modification; Fiber intake; See gastroenterologist if severe",
    },
    Seed {
        name: "Schistosomiasis",
        symptoms: &["abdominal pain", "blood in urine/stool", "fever", "rash"],
        confounders: &["UTI", "Parasitic infection", "Schistosoma-related disease"],
        reasoning: "blood in urine/stool; exposure to freshwater; abdominal pain",
        recommendation: "Get stool/urine test; Anti-helminthic treatment; Public health advice",
    },
    Seed {
        name: "Dengue+Chik",
        symptoms: &["fever", "body pain", "rash", "severe joint pain"],
        confounders: &["Dengue Fever", "Chikungunya", "Viral Fever"],
        reasoning: "fever; joint pain; rash",
        recommendation: "Get blood tests; Hydrate; Rest; Monitor warning signs",
    },
    Seed {
        name: "Hepatitis B",
        symptoms: &["jaundice", "fatigue", "abdominal pain", "dark urine"],
        confounders: &["Hepatitis A", "Hepatitis C", "Alcoholic liver disease"],
        reasoning: "jaundice; abdominal pain; dark urine",
        recommendation: "Get hepatitis panel; Avoid alcohol; Clinical follow-up",
    },
    Seed {
        name: "Diabetic Ketoacidosis",
        symptoms: &["excessive thirst", "frequent urination", "abdominal pain", "confusion", "fruity breath"],
        confounders: &["Diabetes Mellitus", "Dehydration", "Sepsis"],
        reasoning: "high sugar; dehydration; fruity breath",
        recommendation: "Seek emergency care; Check blood glucose and ketones; IV fluids and insulin",
    },
];
